//! Non-interactive command runners

use crate::tui::TerminalEntityBrowser;
use anyhow::Context as _;
use mayaconnect_core::{
    register, ApplicationStore, ContextSelector, HubFixture, LaunchResult, MemorySession,
    ACTION_IDENTIFIER,
};
use mayaconnect_foundation::{
    topics, ConnectConfig, EventBus, EventBusConfig, EventSource, HostEnvironment, HubEvent,
    HubSession, JsonStore,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 세션 사용자가 정해지지 않았을 때
const ANONYMOUS_USER: &str = "anonymous";

/// Command line options that shape the runtime
#[derive(Debug, Default)]
pub struct RuntimeOptions {
    pub hub: Option<PathBuf>,
    pub user: Option<String>,
    pub debug: bool,
}

/// Composed runtime: config, environment, session and the registered bus
pub struct Runtime {
    pub config: ConnectConfig,
    pub env: HostEnvironment,
    pub session: Arc<dyn HubSession>,
    pub bus: EventBus,
}

impl Runtime {
    pub async fn build(options: RuntimeOptions) -> anyhow::Result<Self> {
        let env = HostEnvironment::from_env();

        let mut config = ConnectConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config: {}", e);
            ConnectConfig::default()
        });
        config.apply_env(&env);

        let session: Arc<dyn HubSession> = Arc::new(load_session(&config, &options)?);

        let bus = EventBus::with_config(EventBusConfig {
            debug_mode: options.debug,
            ..Default::default()
        });
        register(&bus, Arc::clone(&session), &config, &env).await;

        Ok(Self {
            config,
            env,
            session,
            bus,
        })
    }

    fn source(&self) -> EventSource {
        EventSource::user(self.session.api_user())
    }
}

/// Load the hub fixture and resolve the acting user
///
/// User precedence: `--user`, fixture `apiUser`, configured api user.
fn load_session(config: &ConnectConfig, options: &RuntimeOptions) -> anyhow::Result<MemorySession> {
    let path = options.hub.clone().or_else(|| config.hub.fixture.clone());

    let mut fixture = match &path {
        Some(path) => JsonStore::read_file::<HubFixture>(path)
            .with_context(|| format!("Failed to load hub fixture {}", path.display()))?,
        None => HubFixture::default(),
    };

    if let Some(user) = &options.user {
        fixture.api_user = user.clone();
    } else if fixture.api_user.is_empty() {
        fixture.api_user = config
            .hub
            .api_user
            .clone()
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());
    }

    Ok(MemorySession::from_fixture(fixture))
}

fn task_selection(task: &str) -> Value {
    json!([{ "entityType": "task", "entityId": task }])
}

/// `apps`: list installations
pub fn run_apps(runtime: &Runtime) -> anyhow::Result<()> {
    let store = ApplicationStore::new(&runtime.config, &runtime.env);
    let applications = store.discover_applications()?;

    let platform = store
        .platform()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "unsupported".to_string());
    println!("Platform: {}  Versions: {}", platform, store.versions().join(", "));

    if applications.is_empty() {
        println!("No Maya installations found.");
        return Ok(());
    }

    println!("\n{:<16} {:<10} {}", "IDENTIFIER", "VERSION", "PATH");
    println!("{}", "-".repeat(72));
    for application in applications {
        println!(
            "{:<16} {:<10} {}",
            application.identifier,
            application.version,
            application.path.display()
        );
    }

    Ok(())
}

/// `discover --task`: publish a discover event
pub async fn run_discover(runtime: &Runtime, task: &str) -> anyhow::Result<()> {
    let event = HubEvent::new(topics::ACTION_DISCOVER)
        .with_data(json!({ "selection": task_selection(task) }))
        .with_source(runtime.source());

    let replies = runtime.bus.publish(&event).await;
    if replies.is_empty() {
        println!("No actions for task {}.", task);
        return Ok(());
    }

    for reply in replies {
        let items = reply["items"].as_array().cloned().unwrap_or_default();
        if items.is_empty() {
            println!("No Maya installations found.");
        }
        for item in items {
            println!(
                "{} {}  ->  {}",
                item["label"].as_str().unwrap_or_default(),
                item["variant"].as_str().unwrap_or_default(),
                item["applicationIdentifier"].as_str().unwrap_or_default()
            );
        }
    }

    Ok(())
}

/// `launch --task --app`: publish a launch event
pub async fn run_launch(runtime: &Runtime, task: &str, app: &str) -> anyhow::Result<()> {
    let event = HubEvent::new(topics::ACTION_LAUNCH)
        .with_data(json!({
            "actionIdentifier": ACTION_IDENTIFIER,
            "applicationIdentifier": app,
            "selection": task_selection(task),
        }))
        .with_source(runtime.source());

    let replies = runtime.bus.publish(&event).await;
    let Some(reply) = replies.into_iter().next() else {
        anyhow::bail!("Launch of {} for task {} was not handled", app, task);
    };

    let result: LaunchResult = serde_json::from_value(reply)?;
    if !result.success {
        anyhow::bail!(result.message);
    }

    println!("{}", result.message);
    Ok(())
}

/// `debug-info`: publish a debug-information event
pub async fn run_debug_info(runtime: &Runtime) -> anyhow::Result<()> {
    let event =
        HubEvent::new(topics::PLUGIN_DEBUG_INFORMATION).with_source(runtime.source());

    for reply in runtime.bus.publish(&event).await {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    }

    Ok(())
}

/// `context [--browse]`: show or pick the current context
pub fn run_context(runtime: &Runtime, browse: bool) -> anyhow::Result<()> {
    let mut selector = ContextSelector::new(Arc::clone(&runtime.session));
    selector.on_entity_changed(|entity| {
        info!(entity = ?entity.map(|e| e.id.as_str()), "Context changed");
    });
    selector.reset(&runtime.env)?;

    print_context(&selector)?;

    if browse {
        let mut browser = TerminalEntityBrowser::new(Arc::clone(&runtime.session));
        if selector.browse(&mut browser)? {
            print_context(&selector)?;
        } else {
            println!("Browse cancelled.");
        }
    }

    Ok(())
}

fn print_context(selector: &ContextSelector) -> anyhow::Result<()> {
    match selector.entity() {
        Some(entity) => println!("Context: {}  ({})", selector.path_text()?, entity.id),
        None => println!("Context: (none)"),
    }
    Ok(())
}
