//! Application Descriptor - 발견된 설치본 하나를 설명하는 레코드

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 템플릿에서 버전으로 치환되는 자리표시자
const VERSION_PLACEHOLDER: &str = "{version}";

// ============================================================================
// ApplicationDescriptor
// ============================================================================

/// 실행 가능한 애플리케이션 설치본
///
/// 발견할 때마다 새로 만들어지며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDescriptor {
    /// 설치본 식별자 (예: `maya_2020`)
    pub identifier: String,

    /// 표시 이름
    pub label: String,

    /// 실행 파일 또는 번들의 절대 경로
    pub path: PathBuf,

    pub version: String,

    pub icon: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// 실행 시 추가 인자
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub launch_arguments: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============================================================================
// ApplicationTemplate
// ============================================================================

/// 디스크립터 템플릿 (`{version}` 치환)
#[derive(Debug, Clone)]
pub struct ApplicationTemplate {
    pub identifier: String,
    pub label: String,
    pub icon: String,
    pub variant: Option<String>,
    pub launch_arguments: Vec<String>,
    pub description: Option<String>,
}

impl ApplicationTemplate {
    pub fn new(identifier: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            icon: "default".to_string(),
            variant: None,
            launch_arguments: Vec::new(),
            description: None,
        }
    }

    /// Maya 기본 템플릿
    pub fn maya() -> Self {
        Self::new("maya_{version}", "Maya")
            .icon("maya")
            .variant("{version}")
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn launch_arguments(mut self, args: Vec<String>) -> Self {
        self.launch_arguments = args;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 경로와 버전으로 디스크립터 생성
    pub fn render(&self, path: &Path, version: &str) -> ApplicationDescriptor {
        let expand = |text: &str| text.replace(VERSION_PLACEHOLDER, version);

        ApplicationDescriptor {
            identifier: expand(&self.identifier),
            label: expand(&self.label),
            path: path.to_path_buf(),
            version: version.to_string(),
            icon: expand(&self.icon),
            variant: self.variant.as_deref().map(expand),
            launch_arguments: self.launch_arguments.iter().map(|a| expand(a)).collect(),
            description: self.description.as_deref().map(expand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maya_template_render() {
        let descriptor = ApplicationTemplate::maya().render(Path::new("/usr/autodesk/maya2020/bin/maya"), "2020");

        assert_eq!(descriptor.identifier, "maya_2020");
        assert_eq!(descriptor.label, "Maya");
        assert_eq!(descriptor.icon, "maya");
        assert_eq!(descriptor.variant.as_deref(), Some("2020"));
        assert_eq!(descriptor.version, "2020");
        assert!(descriptor.launch_arguments.is_empty());
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let descriptor = ApplicationTemplate::maya()
            .launch_arguments(vec!["-proj".to_string()])
            .render(Path::new("/opt/maya"), "2019");

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["launchArguments"][0], "-proj");
        assert!(value.get("description").is_none());
    }
}
