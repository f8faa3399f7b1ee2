//! Process Spawn - 실제 프로세스 생성
//!
//! 실행 명령을 만드는 부분과 생성하는 부분(`ProcessSpawner`)을 나눠
//! 테스트에서 생성 단계만 바꿔 끼울 수 있게 합니다.

use super::environment::ProcessEnvironment;
use crate::application::ApplicationDescriptor;
use async_trait::async_trait;
use mayaconnect_foundation::{Error, Platform, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

// ============================================================================
// LaunchCommand
// ============================================================================

/// 실행할 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl LaunchCommand {
    /// 디스크립터에서 플랫폼에 맞는 명령 생성
    ///
    /// macOS 번들은 `open`으로 열고, 그 외에는 실행 파일을 직접 실행합니다.
    pub fn for_application(application: &ApplicationDescriptor, platform: Platform) -> Self {
        match platform {
            Platform::MacOS => {
                let mut args = vec![application.path.to_string_lossy().into_owned()];
                if !application.launch_arguments.is_empty() {
                    args.push("--args".to_string());
                    args.extend(application.launch_arguments.iter().cloned());
                }
                Self {
                    program: PathBuf::from("open"),
                    args,
                    working_dir: None,
                }
            }
            Platform::Windows | Platform::Linux => Self {
                program: application.path.clone(),
                args: application.launch_arguments.clone(),
                working_dir: application.path.parent().map(|p| p.to_path_buf()),
            },
        }
    }
}

// ============================================================================
// ProcessSpawner
// ============================================================================

/// 프로세스 생성기
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    /// 명령을 주어진 환경으로 시작 (종료를 기다리지 않음)
    async fn spawn(&self, command: &LaunchCommand, env: &ProcessEnvironment) -> Result<u32>;
}

/// tokio 기반 기본 생성기
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

#[async_trait]
impl ProcessSpawner for SystemSpawner {
    async fn spawn(&self, command: &LaunchCommand, env: &ProcessEnvironment) -> Result<u32> {
        info!("Spawning application: {} {:?}", command.program.display(), command.args);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .env_clear()
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| {
            Error::launch(
                command.program.display().to_string(),
                format!("Failed to spawn process: {}", e),
            )
        })?;

        Ok(child.id().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationTemplate;
    use std::path::Path;

    #[test]
    fn test_macos_uses_open() {
        let app = ApplicationTemplate::maya()
            .render(Path::new("/Applications/Autodesk/maya2020/Maya.app"), "2020");

        let command = LaunchCommand::for_application(&app, Platform::MacOS);
        assert_eq!(command.program, PathBuf::from("open"));
        assert_eq!(command.args, vec!["/Applications/Autodesk/maya2020/Maya.app"]);
    }

    #[test]
    fn test_macos_forwards_arguments() {
        let app = ApplicationTemplate::maya()
            .launch_arguments(vec!["-proj".to_string(), "/show".to_string()])
            .render(Path::new("/Applications/Autodesk/maya2020/Maya.app"), "2020");

        let command = LaunchCommand::for_application(&app, Platform::MacOS);
        assert_eq!(command.args[1..], ["--args", "-proj", "/show"]);
    }

    #[test]
    fn test_linux_runs_executable() {
        let app = ApplicationTemplate::maya()
            .render(Path::new("/usr/autodesk/maya2020/bin/maya"), "2020");

        let command = LaunchCommand::for_application(&app, Platform::Linux);
        assert_eq!(command.program, PathBuf::from("/usr/autodesk/maya2020/bin/maya"));
        assert!(command.args.is_empty());
        assert_eq!(command.working_dir, Some(PathBuf::from("/usr/autodesk/maya2020/bin")));
    }

    #[tokio::test]
    async fn test_spawn_missing_program_is_launch_error() {
        let command = LaunchCommand {
            program: PathBuf::from("/definitely/not/a/program"),
            args: Vec::new(),
            working_dir: None,
        };

        let err = SystemSpawner
            .spawn(&command, &ProcessEnvironment::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Launch { .. }));
    }
}
