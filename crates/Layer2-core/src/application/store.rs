//! Application Store - 플랫폼별 설치 위치 탐색
//!
//! 플랫폼마다 설치 레이아웃(루트, 세그먼트, 버전 추출식)을 값 객체로
//! 만들고, Locator 결과를 디스크립터로 바꿉니다.

use super::descriptor::{ApplicationDescriptor, ApplicationTemplate};
use crate::locator::{capture_version, locate, SearchPattern, Segment};
use mayaconnect_foundation::{ConnectConfig, HostEnvironment, Platform, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// whitelist가 없을 때 쓰는 관례적 버전 추출식
pub const CONVENTIONAL_VERSION_EXPRESSION: &str = r"(?P<version>[\d.]+[\d.]+)";

// ============================================================================
// PlatformLayout
// ============================================================================

/// 플랫폼별 설치 레이아웃
#[derive(Debug, Clone)]
pub struct PlatformLayout {
    pub platform: Platform,

    /// 기본 시작 디렉토리
    pub root: PathBuf,

    /// 기본 설치 루트까지의 세그먼트 (override 시 생략)
    pub prefix: Vec<Segment>,

    /// 설치 루트 아래 실행 파일까지의 세그먼트
    pub pattern: Vec<Segment>,

    pub version_expression: Regex,

    /// 추출 후 적용할 버전 필터 (비어 있으면 필터 없음)
    pub allowed_versions: Vec<String>,
}

impl PlatformLayout {
    /// 플랫폼과 허용 버전 목록으로 레이아웃 구성
    pub fn for_platform(platform: Platform, versions: &[String]) -> Result<Self> {
        let escaped: Vec<String> = versions.iter().map(|v| regex::escape(v)).collect();
        let alternatives = escaped.join("|");
        let conventional = Regex::new(CONVENTIONAL_VERSION_EXPRESSION)?;

        let layout = match platform {
            Platform::MacOS => Self {
                platform,
                root: PathBuf::from("/"),
                prefix: vec![Segment::literal("Applications")],
                pattern: vec![
                    Segment::literal("Autodesk"),
                    Segment::pattern("maya.+")?,
                    Segment::literal("Maya.app"),
                ],
                version_expression: conventional,
                allowed_versions: versions.to_vec(),
            },
            Platform::Windows => Self {
                platform,
                root: SearchPattern::from_segments(&["C:"], Vec::new()).root,
                prefix: vec![Segment::pattern("Program Files.*")?],
                pattern: vec![
                    Segment::literal("Autodesk"),
                    Segment::pattern("Maya.+")?,
                    Segment::literal("bin"),
                    Segment::literal("maya.exe"),
                ],
                version_expression: if escaped.is_empty() {
                    conventional
                } else {
                    Regex::new(&format!("(?P<version>{})", alternatives))?
                },
                allowed_versions: Vec::new(),
            },
            Platform::Linux => Self {
                platform,
                root: PathBuf::from("/"),
                prefix: vec![
                    Segment::literal("usr"),
                    Segment::literal("autodesk"),
                    Segment::pattern("maya.+")?,
                ],
                pattern: vec![Segment::literal("bin"), Segment::literal("maya")],
                version_expression: if escaped.is_empty() {
                    conventional
                } else {
                    Regex::new(&format!("maya(?P<version>{})", alternatives))?
                },
                allowed_versions: Vec::new(),
            },
        };

        Ok(layout)
    }

    /// 검색 패턴 생성
    ///
    /// `location`이 존재하는 디렉토리면 기본 루트와 prefix를 대신합니다.
    pub fn search_pattern(&self, location: Option<&Path>) -> SearchPattern {
        let pattern = match location.filter(|path| path.is_dir()) {
            Some(location) => SearchPattern::new(location),
            None => SearchPattern::new(&self.root).segments(self.prefix.iter().cloned()),
        };

        pattern
            .segments(self.pattern.iter().cloned())
            .version_expression(self.version_expression.clone())
    }

    fn allows(&self, version: &str) -> bool {
        self.allowed_versions.is_empty() || self.allowed_versions.iter().any(|v| v == version)
    }
}

// ============================================================================
// ApplicationStore
// ============================================================================

/// 설치된 애플리케이션 탐색기
#[derive(Debug, Clone)]
pub struct ApplicationStore {
    platform: Option<Platform>,
    versions: Vec<String>,
    location: Option<PathBuf>,
    template: ApplicationTemplate,
}

impl ApplicationStore {
    /// 구성 시점의 설정과 환경으로 생성
    pub fn new(config: &ConnectConfig, env: &HostEnvironment) -> Self {
        Self {
            platform: Platform::detect(),
            versions: config.maya_versions(),
            location: env.maya_location.clone(),
            template: ApplicationTemplate::maya(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_template(mut self, template: ApplicationTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// 설치된 애플리케이션 찾기 (호출마다 새로 탐색)
    pub fn discover_applications(&self) -> Result<Vec<ApplicationDescriptor>> {
        let Some(platform) = self.platform else {
            debug!("Unsupported platform, no applications discovered");
            return Ok(Vec::new());
        };

        let layout = PlatformLayout::for_platform(platform, &self.versions)?;
        let pattern = layout.search_pattern(self.location.as_deref());

        let applications: Vec<ApplicationDescriptor> = locate(&pattern)
            .into_iter()
            .filter_map(|located| {
                let version = located
                    .version
                    .or_else(|| capture_version(&layout.version_expression, &located.path))?;
                if !layout.allows(&version) {
                    return None;
                }
                Some(self.template.render(&located.path, &version))
            })
            .collect();

        debug!(
            platform = %platform,
            root = %pattern.root.display(),
            count = applications.len(),
            "Discovered applications: {:#?}",
            applications
        );

        Ok(applications)
    }

    /// 식별자로 애플리케이션 찾기 (중복 시 마지막 것)
    pub fn get_application(&self, identifier: &str) -> Result<Option<ApplicationDescriptor>> {
        Ok(self
            .discover_applications()?
            .into_iter()
            .filter(|app| app.identifier == identifier)
            .last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn versions(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    fn store(platform: Platform, location: &Path, allowed: &[&str]) -> ApplicationStore {
        let config = ConnectConfig::new().with_maya_versions(versions(allowed));
        let env = HostEnvironment {
            maya_location: Some(location.to_path_buf()),
            ..Default::default()
        };
        ApplicationStore::new(&config, &env).with_platform(platform)
    }

    #[test]
    fn test_windows_layout_whitelist() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Autodesk/Maya2018/bin/maya.exe"));
        touch(&dir.path().join("Autodesk/Maya2019/bin/maya.exe"));
        touch(&dir.path().join("Autodesk/Maya2020/bin/maya.exe"));

        let apps = store(Platform::Windows, dir.path(), &["2018", "2020"])
            .discover_applications()
            .unwrap();

        let ids: Vec<&str> = apps.iter().map(|a| a.identifier.as_str()).collect();
        assert_eq!(ids, vec!["maya_2018", "maya_2020"]);
    }

    #[test]
    fn test_linux_layout_under_location() {
        let dir = tempfile::tempdir().unwrap();
        let install = dir.path().join("maya2019");
        touch(&install.join("bin/maya"));

        let apps = store(Platform::Linux, &install, &["2019"])
            .discover_applications()
            .unwrap();

        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].version, "2019");
        assert_eq!(apps[0].path, install.join("bin/maya"));
    }

    #[test]
    fn test_macos_bundle_filtered_after_capture() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Autodesk/maya2019/Maya.app/Contents")).unwrap();
        fs::create_dir_all(dir.path().join("Autodesk/maya2017/Maya.app/Contents")).unwrap();

        let apps = store(Platform::MacOS, dir.path(), &["2019"])
            .discover_applications()
            .unwrap();

        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].identifier, "maya_2019");
        assert_eq!(apps[0].variant.as_deref(), Some("2019"));
    }

    #[test]
    fn test_empty_whitelist_uses_conventional_version() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Autodesk/Maya2022/bin/maya.exe"));

        let apps = store(Platform::Windows, dir.path(), &[])
            .discover_applications()
            .unwrap();

        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].version, "2022");
    }

    #[test]
    fn test_missing_install_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let apps = store(Platform::Windows, dir.path(), &["2020"])
            .discover_applications()
            .unwrap();
        assert!(apps.is_empty());
    }

    #[test]
    fn test_get_application() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Autodesk/Maya2020/bin/maya.exe"));

        let store = store(Platform::Windows, dir.path(), &["2020"]);
        assert!(store.get_application("maya_2020").unwrap().is_some());
        assert!(store.get_application("maya_2018").unwrap().is_none());
    }

    #[test]
    fn test_versions_are_escaped() {
        let layout = PlatformLayout::for_platform(Platform::Linux, &versions(&["2018.5"])).unwrap();
        assert!(layout.version_expression.is_match("maya2018.5"));
        assert!(!layout.version_expression.is_match("maya2018x5"));
    }

    #[test]
    fn test_default_layout_roots() {
        let mac = PlatformLayout::for_platform(Platform::MacOS, &[]).unwrap();
        let pattern = mac.search_pattern(None);
        assert_eq!(pattern.root, PathBuf::from("/"));
        assert_eq!(pattern.segments.len(), 4);

        let linux = PlatformLayout::for_platform(Platform::Linux, &[]).unwrap();
        assert_eq!(linux.search_pattern(None).segments.len(), 5);

        // 존재하지 않는 override는 무시
        let ignored = linux.search_pattern(Some(Path::new("/definitely/not/here")));
        assert_eq!(ignored.segments.len(), 5);
    }
}
