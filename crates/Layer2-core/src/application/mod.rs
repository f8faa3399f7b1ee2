//! Application - 설치된 호스트 애플리케이션 탐색
//!
//! - `descriptor`: ApplicationDescriptor, 템플릿
//! - `store`: 플랫폼 레이아웃과 ApplicationStore

pub mod descriptor;
pub mod store;

pub use descriptor::{ApplicationDescriptor, ApplicationTemplate};
pub use store::{ApplicationStore, PlatformLayout, CONVENTIONAL_VERSION_EXPRESSION};
