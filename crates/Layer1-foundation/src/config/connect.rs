//! Connect Config - 통합 설정
//!
//! 글로벌 + 프로젝트 JSON 설정을 병합하고 환경 변수를 덧씌웁니다.
//! 전역 싱글턴 없이, 구성 시점에 한 번 로드해서 명시적으로 전달합니다.

use crate::env_detect::HostEnvironment;
use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 설정 파일명
pub const CONNECT_CONFIG_FILE: &str = "config.json";

/// 설정이 없을 때 허용하는 Maya 버전
pub const DEFAULT_MAYA_VERSIONS: &[&str] = &["2018", "2019", "2020"];

// ============================================================================
// Connect Config (통합)
// ============================================================================

/// Maya Connect 통합 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// Hub 연결 설정
    #[serde(default)]
    pub hub: HubConfig,

    /// 애플리케이션별 설정
    #[serde(default)]
    pub applications: ApplicationsConfig,
}

impl ConnectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<ConnectConfig>(CONNECT_CONFIG_FILE)? {
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) =
                project.load_optional::<ConnectConfig>(CONNECT_CONFIG_FILE)?
            {
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// 특정 저장소에서만 로드
    pub fn load_from(store: &JsonStore) -> Result<Self> {
        Ok(store
            .load_optional::<ConnectConfig>(CONNECT_CONFIG_FILE)?
            .unwrap_or_default())
    }

    /// 글로벌 설정 저장
    pub fn save_global(&self) -> Result<()> {
        self.save_to(&JsonStore::global()?)
    }

    /// 특정 저장소에 저장
    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.save(CONNECT_CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: ConnectConfig) {
        self.hub.merge(other.hub);
        self.applications.merge(other.applications);
    }

    /// 환경 변수 덧씌우기 (FTRACK_SERVER, FTRACK_API_USER)
    pub fn apply_env(&mut self, env: &HostEnvironment) {
        if env.server.is_some() {
            self.hub.server = env.server.clone();
        }
        if env.api_user.is_some() {
            self.hub.api_user = env.api_user.clone();
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// 허용된 Maya 버전 목록
    pub fn maya_versions(&self) -> Vec<String> {
        match &self.applications.maya.versions {
            Some(versions) => versions.clone(),
            None => DEFAULT_MAYA_VERSIONS.iter().map(|v| v.to_string()).collect(),
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn with_maya_versions(mut self, versions: Vec<String>) -> Self {
        self.applications.maya.versions = Some(versions);
        self
    }

    pub fn api_user(mut self, user: impl Into<String>) -> Self {
        self.hub.api_user = Some(user.into());
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.hub.server = Some(server.into());
        self
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            hub: HubConfig::default(),
            applications: ApplicationsConfig::default(),
        }
    }
}

fn default_version() -> u32 {
    1
}

// ============================================================================
// Hub Config
// ============================================================================

/// Hub 연결 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubConfig {
    /// 서버 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// API 사용자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_user: Option<String>,

    /// 로컬 Hub 데이터 파일 (MemorySession용)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,
}

impl HubConfig {
    pub fn merge(&mut self, other: HubConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.api_user.is_some() {
            self.api_user = other.api_user;
        }
        if other.fixture.is_some() {
            self.fixture = other.fixture;
        }
    }
}

// ============================================================================
// Applications Config
// ============================================================================

/// 애플리케이션별 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationsConfig {
    #[serde(default)]
    pub maya: ApplicationConfig,
}

impl ApplicationsConfig {
    pub fn merge(&mut self, other: ApplicationsConfig) {
        self.maya.merge(other.maya);
    }
}

/// 단일 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConfig {
    /// 허용 버전 whitelist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<String>>,
}

impl ApplicationConfig {
    pub fn merge(&mut self, other: ApplicationConfig) {
        if other.versions.is_some() {
            self.versions = other.versions;
        }
    }
}
