//! Application Launcher - 환경 구성과 실행
//!
//! 기본 환경(현재 프로세스 또는 주입된 맵)에 Hub 연결 정보와
//! 선택된 Task 정보를 더해 애플리케이션을 시작합니다.

use super::environment::ProcessEnvironment;
use super::spawn::{LaunchCommand, ProcessSpawner, SystemSpawner};
use crate::application::{ApplicationDescriptor, ApplicationStore};
use mayaconnect_foundation::{
    ConnectConfig, Error, HubSession, LaunchContext, Platform, Result, ENV_API_USER, ENV_SERVER,
    ENV_SHOT_ID, ENV_TASK_ID,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// LaunchResult
// ============================================================================

/// Hub에 돌려주는 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchResult {
    pub success: bool,
    pub message: String,
}

impl LaunchResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// ============================================================================
// ApplicationLauncher
// ============================================================================

/// 애플리케이션 실행기
pub struct ApplicationLauncher {
    store: Arc<ApplicationStore>,
    session: Arc<dyn HubSession>,
    server: Option<String>,
    base_environment: Option<ProcessEnvironment>,
    spawner: Arc<dyn ProcessSpawner>,
}

impl ApplicationLauncher {
    pub fn new(
        store: Arc<ApplicationStore>,
        session: Arc<dyn HubSession>,
        config: &ConnectConfig,
    ) -> Self {
        Self {
            store,
            session,
            server: config.hub.server.clone(),
            base_environment: None,
            spawner: Arc::new(SystemSpawner),
        }
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn ProcessSpawner>) -> Self {
        self.spawner = spawner;
        self
    }

    /// 현재 프로세스 환경 대신 쓸 기본 환경
    pub fn with_base_environment(mut self, env: ProcessEnvironment) -> Self {
        self.base_environment = Some(env);
        self
    }

    pub fn store(&self) -> &Arc<ApplicationStore> {
        &self.store
    }

    /// 기본 환경 + Hub 연결 정보
    pub fn base_environment(&self) -> ProcessEnvironment {
        let mut env = match &self.base_environment {
            Some(env) => env.clone(),
            None => ProcessEnvironment::from_process(),
        };

        env.set(ENV_API_USER, self.session.api_user());
        if let Some(server) = &self.server {
            env.set(ENV_SERVER, server.as_str());
        }

        env
    }

    /// 실행 환경 구성
    ///
    /// 선택된 엔티티로 Task를 조회하고 Task/부모 id를 추가합니다.
    /// Task가 없으면 `Error::NotFound`를 그대로 돌려줍니다.
    pub fn get_application_environment(
        &self,
        application: &ApplicationDescriptor,
        context: &LaunchContext,
    ) -> Result<ProcessEnvironment> {
        let mut env = self.base_environment();

        let selected = context.selected().ok_or_else(|| {
            Error::InvalidInput(format!(
                "Launching {} requires exactly one selected entity, got {}",
                application.identifier,
                context.selection.len()
            ))
        })?;

        let task = self.session.query_task(&selected.entity_id)?;

        env.set(ENV_TASK_ID, task.id.as_str());
        env.set(ENV_SHOT_ID, task.parent_id.clone().unwrap_or_default());

        debug!(
            application = %application.identifier,
            task = %task.id,
            "Built application environment"
        );

        Ok(env)
    }

    /// 식별자로 애플리케이션 실행
    pub async fn launch(&self, identifier: &str, context: &LaunchContext) -> Result<LaunchResult> {
        let Some(application) = self.store.get_application(identifier)? else {
            return Ok(LaunchResult::failure(format!(
                "{} application not found.",
                identifier
            )));
        };

        let env = self.get_application_environment(&application, context)?;
        let platform = self.store.platform().unwrap_or(Platform::Linux);
        let command = LaunchCommand::for_application(&application, platform);

        let pid = self.spawner.spawn(&command, &env).await?;
        info!(application = %application.identifier, pid, "Application started");

        Ok(LaunchResult::success(format!(
            "{} application started.",
            application.label
        )))
    }
}

impl std::fmt::Debug for ApplicationLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationLauncher")
            .field("store", &self.store)
            .field("server", &self.server)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use async_trait::async_trait;
    use mayaconnect_foundation::{Entity, EntityRef, HostEnvironment};
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSpawner {
        calls: Mutex<Vec<(LaunchCommand, ProcessEnvironment)>>,
    }

    #[async_trait]
    impl ProcessSpawner for RecordingSpawner {
        async fn spawn(&self, command: &LaunchCommand, env: &ProcessEnvironment) -> Result<u32> {
            self.calls.lock().unwrap().push((command.clone(), env.clone()));
            Ok(42)
        }
    }

    fn session() -> Arc<MemorySession> {
        Arc::new(MemorySession::new("alice").with_entities(vec![
            Entity::new("p1", "Project").name("show"),
            Entity::new("s1", "Shot").name("sh010").parent("p1"),
            Entity::new("t1", "Task").name("anim").parent("s1"),
        ]))
    }

    fn launcher(store: ApplicationStore) -> ApplicationLauncher {
        let config = ConnectConfig::new().server("https://hub.example");
        ApplicationLauncher::new(Arc::new(store), session(), &config)
            .with_base_environment(ProcessEnvironment::new().with("PATH", "/bin").with(ENV_TASK_ID, "stale"))
    }

    fn empty_store() -> ApplicationStore {
        ApplicationStore::new(&ConnectConfig::new(), &HostEnvironment::default())
            .with_platform(Platform::Linux)
    }

    #[test]
    fn test_environment_contains_task_and_shot() {
        let launcher = launcher(empty_store());
        let app = crate::application::ApplicationTemplate::maya().render(Path::new("/opt/maya"), "2020");
        let context = LaunchContext::new(vec![EntityRef::task("t1")]);

        let env = launcher.get_application_environment(&app, &context).unwrap();

        assert_eq!(env.get(ENV_TASK_ID), Some("t1"));
        assert_eq!(env.get(ENV_SHOT_ID), Some("s1"));
        assert_eq!(env.get("PATH"), Some("/bin"));
        assert_eq!(env.get(ENV_API_USER), Some("alice"));
        assert_eq!(env.get(ENV_SERVER), Some("https://hub.example"));
    }

    #[test]
    fn test_unknown_task_propagates_not_found() {
        let launcher = launcher(empty_store());
        let app = crate::application::ApplicationTemplate::maya().render(Path::new("/opt/maya"), "2020");
        let context = LaunchContext::new(vec![EntityRef::task("missing")]);

        let err = launcher.get_application_environment(&app, &context).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_launch_unknown_application() {
        let launcher = launcher(empty_store());
        let context = LaunchContext::new(vec![EntityRef::task("t1")]);

        let result = launcher.launch("maya_1999", &context).await.unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_launch_spawns_with_environment() {
        let dir = tempfile::tempdir().unwrap();
        let install = dir.path().join("maya2020");
        std::fs::create_dir_all(install.join("bin")).unwrap();
        std::fs::write(install.join("bin/maya"), b"").unwrap();

        let env = HostEnvironment {
            maya_location: Some(install.clone()),
            ..Default::default()
        };
        let store = ApplicationStore::new(&ConnectConfig::new(), &env).with_platform(Platform::Linux);
        let spawner = Arc::new(RecordingSpawner::default());
        let launcher = launcher(store).with_spawner(spawner.clone());

        let context = LaunchContext::new(vec![EntityRef::task("t1")]);
        let result = launcher.launch("maya_2020", &context).await.unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Maya application started.");

        let calls = spawner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.program, install.join("bin/maya"));
        assert_eq!(calls[0].1.get(ENV_TASK_ID), Some("t1"));
    }
}
