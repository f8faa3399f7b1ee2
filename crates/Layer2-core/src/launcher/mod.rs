//! Launcher - 실행 환경 구성과 프로세스 생성
//!
//! ```text
//! launch(identifier, context)
//!     │
//!     ├─▶ ApplicationStore::get_application
//!     ├─▶ get_application_environment (base + FTRACK_TASKID / FTRACK_SHOTID)
//!     └─▶ ProcessSpawner::spawn(LaunchCommand, ProcessEnvironment)
//! ```

pub mod environment;
#[allow(clippy::module_inception)]
pub mod launcher;
pub mod spawn;

pub use environment::ProcessEnvironment;
pub use launcher::{ApplicationLauncher, LaunchResult};
pub use spawn::{LaunchCommand, ProcessSpawner, SystemSpawner};
