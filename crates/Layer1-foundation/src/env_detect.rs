//! Environment Detection - 플랫폼/환경 변수 감지
//!
//! 실행 중인 OS와, 구성 시점에 한 번 읽는 환경 변수들을 제공합니다.

use std::env;
use std::path::PathBuf;

/// Maya 설치 루트 override
pub const ENV_MAYA_LOCATION: &str = "MAYA_LOCATION";
/// 현재 Task id
pub const ENV_TASK_ID: &str = "FTRACK_TASKID";
/// 현재 Shot id (Task의 부모)
pub const ENV_SHOT_ID: &str = "FTRACK_SHOTID";
/// Hub 서버 URL
pub const ENV_SERVER: &str = "FTRACK_SERVER";
/// Hub API 사용자
pub const ENV_API_USER: &str = "FTRACK_API_USER";

/// 지원 플랫폼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    /// 현재 OS 감지 (지원하지 않는 OS면 None)
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "windows") {
            Some(Self::Windows)
        } else if cfg!(target_os = "macos") {
            Some(Self::MacOS)
        } else if cfg!(target_os = "linux") {
            Some(Self::Linux)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOS => "macOS",
            Self::Linux => "Linux",
        }
    }

    /// 문자열에서 파싱 (CLI 인자용)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "windows" | "win32" | "win" => Some(Self::Windows),
            "macos" | "darwin" | "osx" | "mac" => Some(Self::MacOS),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 구성 시점에 읽은 환경 변수 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    pub maya_location: Option<PathBuf>,
    pub task_id: Option<String>,
    pub shot_id: Option<String>,
    pub server: Option<String>,
    pub api_user: Option<String>,
}

impl HostEnvironment {
    /// 현재 프로세스 환경에서 읽기
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 생성 (빈 값은 없는 것으로 취급)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            maya_location: get(ENV_MAYA_LOCATION).map(PathBuf::from),
            task_id: get(ENV_TASK_ID),
            shot_id: get(ENV_SHOT_ID),
            server: get(ENV_SERVER),
            api_user: get(ENV_API_USER),
        }
    }

    /// 현재 작업 엔티티 id (Task 우선, 없으면 Shot)
    pub fn current_entity_id(&self) -> Option<&str> {
        self.task_id.as_deref().or(self.shot_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_task_id_preferred_over_shot() {
        let env = HostEnvironment::from_lookup(lookup(&[
            (ENV_TASK_ID, "task-1"),
            (ENV_SHOT_ID, "shot-1"),
        ]));
        assert_eq!(env.current_entity_id(), Some("task-1"));
    }

    #[test]
    fn test_shot_fallback_and_empty_values() {
        let env = HostEnvironment::from_lookup(lookup(&[
            (ENV_TASK_ID, ""),
            (ENV_SHOT_ID, "shot-1"),
            (ENV_MAYA_LOCATION, "/opt/maya2020"),
        ]));
        assert_eq!(env.current_entity_id(), Some("shot-1"));
        assert_eq!(env.maya_location, Some(PathBuf::from("/opt/maya2020")));
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!(Platform::parse("darwin"), Some(Platform::MacOS));
        assert_eq!(Platform::parse("Win32"), Some(Platform::Windows));
        assert_eq!(Platform::parse("linux"), Some(Platform::Linux));
        assert_eq!(Platform::parse("plan9"), None);
    }
}
