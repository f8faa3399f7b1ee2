//! Config - 통합 설정 관리
//!
//! - `connect.rs` - ConnectConfig 통합 설정

mod connect;

pub use connect::{
    ApplicationConfig, ApplicationsConfig, ConnectConfig, HubConfig, CONNECT_CONFIG_FILE,
    DEFAULT_MAYA_VERSIONS,
};
