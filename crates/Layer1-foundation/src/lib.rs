//! # mayaconnect-foundation
//!
//! Foundation layer for Maya Connect:
//! - Hub: Hub 엔티티 타입, LaunchContext, HubSession trait
//! - Event: 타입이 있는 구독 기반 이벤트 버스
//! - Config: 통합 설정 (ConnectConfig)
//! - Storage: JsonStore (설정, Hub fixture)
//! - Environment: 플랫폼 감지, 환경 변수 스냅샷
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  EventBus (discover / launch / debug-information)       │
//! │                     │                                   │
//! │                     ▼                                   │
//! │          Action handlers (Layer2)                       │
//! │                     │                                   │
//! │          ┌─────────┴─────────┐                         │
//! │          ▼                   ▼                         │
//! │   ApplicationStore     ApplicationLauncher             │
//! │   (filesystem)         (HubSession + environment)      │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod hub;
pub mod env_detect;
pub mod error;
pub mod event;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Hub (Hub 타입 및 세션)
// ============================================================================
pub use hub::{
    parse_selection, Entity, EntityRef, HubSession, LaunchContext, ENTITY_PROJECT, ENTITY_SHOT,
    ENTITY_TASK, SELECTION_TASK,
};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    ApplicationConfig, ApplicationsConfig, ConnectConfig, HubConfig, CONNECT_CONFIG_FILE,
    DEFAULT_MAYA_VERSIONS,
};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;

// ============================================================================
// Event (이벤트 시스템)
// ============================================================================
pub use event::{
    topics, EventBus, EventBusConfig, EventHandler, EventId, EventPredicate, EventSource,
    EventUser, HubEvent, Subscription, SubscriptionId, DEFAULT_PRIORITY,
};

// ============================================================================
// Environment Detection (환경 감지)
// ============================================================================
pub use env_detect::{
    HostEnvironment, Platform, ENV_API_USER, ENV_MAYA_LOCATION, ENV_SERVER, ENV_SHOT_ID,
    ENV_TASK_ID,
};
