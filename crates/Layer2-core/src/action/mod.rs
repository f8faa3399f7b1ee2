//! Launch Action - discover/launch/debug-information 이벤트 처리
//!
//! | 토픽 | 조건 | 응답 |
//! |------|------|------|
//! | `ftrack.action.discover` | 현재 사용자, priority 10 | `{items: [...]}` |
//! | `ftrack.action.launch` | 현재 사용자 + actionIdentifier | `LaunchResult` |
//! | `ftrack.connect.plugin.debug-information` | 없음 | `{name, version}` |
//!
//! 핸들러 안에서 발생한 에러는 잡지 않고 버스로 돌려보냅니다.

use crate::application::ApplicationStore;
use crate::launcher::ApplicationLauncher;
use async_trait::async_trait;
use mayaconnect_foundation::{
    parse_selection, topics, EntityRef, Error, EventBus, EventHandler, HubEvent, HubSession,
    LaunchContext, Result, Subscription, SubscriptionId, ENTITY_TASK, SELECTION_TASK,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, trace};

/// 이 액션의 식별자
pub const ACTION_IDENTIFIER: &str = "ftrack-connect-launch-maya";

/// debug-information 응답 이름
pub const PLUGIN_NAME: &str = "ftrack connect maya";

/// discover 구독 우선순위
pub const DISCOVER_PRIORITY: i32 = 10;

// ============================================================================
// LaunchApplicationAction
// ============================================================================

/// Maya discover/launch 액션
pub struct LaunchApplicationAction {
    store: Arc<ApplicationStore>,
    launcher: Arc<ApplicationLauncher>,
    session: Arc<dyn HubSession>,
}

impl LaunchApplicationAction {
    pub fn new(
        store: Arc<ApplicationStore>,
        launcher: Arc<ApplicationLauncher>,
        session: Arc<dyn HubSession>,
    ) -> Self {
        Self {
            store,
            launcher,
            session,
        }
    }

    pub fn identifier(&self) -> &'static str {
        ACTION_IDENTIFIER
    }

    /// 현재 사용자 기준으로 세 구독 등록
    pub async fn register(self: &Arc<Self>, bus: &EventBus) -> Vec<SubscriptionId> {
        let user = self.session.api_user().to_string();

        let discover = bus
            .subscribe(
                Subscription::topic(topics::ACTION_DISCOVER)
                    .from_user(user.clone())
                    .priority(DISCOVER_PRIORITY),
                Arc::new(DiscoverHandler(Arc::clone(self))),
            )
            .await;

        let launch = bus
            .subscribe(
                Subscription::topic(topics::ACTION_LAUNCH)
                    .from_user(user.clone())
                    .with_action(ACTION_IDENTIFIER),
                Arc::new(LaunchHandler(Arc::clone(self))),
            )
            .await;

        let debug_information = bus
            .subscribe(
                Subscription::topic(topics::PLUGIN_DEBUG_INFORMATION),
                Arc::new(DebugInformationHandler),
            )
            .await;

        debug!(user = %user, "Registered {} action", ACTION_IDENTIFIER);
        vec![discover, launch, debug_information]
    }

    /// selection이 Hub에 존재하는 Task 하나인지 확인
    pub fn is_valid_selection(&self, selection: &[EntityRef]) -> Result<bool> {
        let [entity] = selection else {
            return Ok(false);
        };
        if entity.entity_type != SELECTION_TASK {
            return Ok(false);
        }

        Ok(self.session.get(ENTITY_TASK, &entity.entity_id)?.is_some())
    }

    /// payload의 selection이 유효한지 확인 (형식 오류는 유효하지 않은 것으로 처리)
    fn accepts_payload(&self, event: &HubEvent) -> Result<bool> {
        match parse_selection(&event.data) {
            Ok(selection) => self.is_valid_selection(&selection),
            Err(e) => {
                trace!(event = %event.id, "Rejected selection: {}", e);
                Ok(false)
            }
        }
    }

    /// discover 응답 생성 (selection이 유효하지 않으면 None)
    pub fn discover(&self, event: &HubEvent) -> Result<Option<Value>> {
        if !self.accepts_payload(event)? {
            trace!(event = %event.id, "Discover ignored, invalid selection");
            return Ok(None);
        }

        let mut applications = self.store.discover_applications()?;
        applications.sort_by(|a, b| a.label.cmp(&b.label));

        let items: Vec<Value> = applications
            .iter()
            .map(|application| {
                let icon = if application.icon.is_empty() {
                    "default"
                } else {
                    application.icon.as_str()
                };
                json!({
                    "actionIdentifier": ACTION_IDENTIFIER,
                    "label": application.label,
                    "icon": icon,
                    "variant": application.variant,
                    "applicationIdentifier": application.identifier,
                })
            })
            .collect();

        Ok(Some(json!({ "items": items })))
    }

    /// launch 처리
    ///
    /// 다른 리스너가 처리하지 않도록 selection 확인보다 먼저 `stop()`을 호출합니다.
    pub async fn launch(&self, event: &HubEvent) -> Result<Option<Value>> {
        event.stop();

        if !self.accepts_payload(event)? {
            trace!(event = %event.id, "Launch ignored, invalid selection");
            return Ok(None);
        }

        let identifier = event.data_str("applicationIdentifier").ok_or_else(|| {
            Error::InvalidInput("Launch event has no applicationIdentifier".to_string())
        })?;
        let context = LaunchContext::from_payload(&event.data, Some(event.source.clone()))?;

        let result = self.launcher.launch(identifier, &context).await?;
        Ok(Some(serde_json::to_value(result)?))
    }

    /// 버전 정보
    pub fn version_information() -> Value {
        json!({
            "name": PLUGIN_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        })
    }
}

impl std::fmt::Debug for LaunchApplicationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchApplicationAction")
            .field("identifier", &ACTION_IDENTIFIER)
            .field("api_user", &self.session.api_user())
            .finish()
    }
}

// ============================================================================
// Handlers
// ============================================================================

struct DiscoverHandler(Arc<LaunchApplicationAction>);

#[async_trait]
impl EventHandler for DiscoverHandler {
    fn name(&self) -> &str {
        "maya-discover"
    }

    async fn handle(&self, event: &HubEvent) -> Result<Option<Value>> {
        self.0.discover(event)
    }
}

struct LaunchHandler(Arc<LaunchApplicationAction>);

#[async_trait]
impl EventHandler for LaunchHandler {
    fn name(&self) -> &str {
        "maya-launch"
    }

    async fn handle(&self, event: &HubEvent) -> Result<Option<Value>> {
        self.0.launch(event).await
    }
}

struct DebugInformationHandler;

#[async_trait]
impl EventHandler for DebugInformationHandler {
    fn name(&self) -> &str {
        "maya-debug-information"
    }

    async fn handle(&self, _event: &HubEvent) -> Result<Option<Value>> {
        Ok(Some(LaunchApplicationAction::version_information()))
    }
}
