//! mayaconnect-core: Maya 탐색/실행 통합
//!
//! Layer2 - Hub 이벤트를 받아 설치된 Maya를 찾고 실행하는 레이어
//!
//! # 주요 모듈
//!
//! - `locator`: 경로 세그먼트 패턴 기반 파일 시스템 탐색
//! - `application`: 플랫폼별 설치 레이아웃, ApplicationStore
//! - `launcher`: 실행 환경 구성, 프로세스 생성
//! - `action`: discover/launch/debug-information 이벤트 핸들러
//! - `session`: 메모리 기반 HubSession (JSON fixture)
//! - `context`: 현재 작업 엔티티 선택 모델
//!
//! # 사용 예시
//!
//! ```ignore
//! use mayaconnect_core::{register, MemorySession};
//! use mayaconnect_foundation::{ConnectConfig, EventBus, HostEnvironment};
//!
//! let bus = EventBus::new();
//! let session = Arc::new(MemorySession::load(Path::new("hub.json"))?);
//! let config = ConnectConfig::load()?;
//!
//! register(&bus, session, &config, &HostEnvironment::from_env()).await;
//!
//! let replies = bus.publish(&discover_event).await;
//! ```

pub mod action;
pub mod application;
pub mod context;
pub mod launcher;
pub mod locator;
pub mod session;

use mayaconnect_foundation::{ConnectConfig, EventBus, HostEnvironment, HubSession};
use std::sync::Arc;

// Re-exports: Action
pub use action::{LaunchApplicationAction, ACTION_IDENTIFIER, DISCOVER_PRIORITY, PLUGIN_NAME};

// Re-exports: Application
pub use application::{
    ApplicationDescriptor, ApplicationStore, ApplicationTemplate, PlatformLayout,
    CONVENTIONAL_VERSION_EXPRESSION,
};

// Re-exports: Context
pub use context::{ContextSelector, EntityBrowser, EntityChangedCallback, PATH_SEPARATOR};

// Re-exports: Launcher
pub use launcher::{
    ApplicationLauncher, LaunchCommand, LaunchResult, ProcessEnvironment, ProcessSpawner,
    SystemSpawner,
};

// Re-exports: Locator
pub use locator::{capture_version, locate, LocatedPath, SearchPattern, Segment};

// Re-exports: Session
pub use session::{HubFixture, MemorySession};

/// store, launcher, action을 만들어 버스에 등록
///
/// 설정과 환경 변수는 여기서 한 번 전달되고 이후 전역 상태로 남지 않습니다.
pub async fn register(
    bus: &EventBus,
    session: Arc<dyn HubSession>,
    config: &ConnectConfig,
    env: &HostEnvironment,
) -> Arc<LaunchApplicationAction> {
    let store = Arc::new(ApplicationStore::new(config, env));
    let launcher = Arc::new(ApplicationLauncher::new(
        Arc::clone(&store),
        Arc::clone(&session),
        config,
    ));

    let action = Arc::new(LaunchApplicationAction::new(store, launcher, session));
    action.register(bus).await;
    action
}
