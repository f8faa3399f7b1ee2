//! Event Bus - 프로세스 내 Hub 이벤트 발행/구독
//!
//! 구독은 문자열 필터 대신 타입이 있는 `Subscription`(토픽 + 조건자)으로
//! 등록합니다. 핸들러는 우선순위 순서로 하나씩 실행되며, 핸들러가
//! `HubEvent::stop()`을 호출하면 이후 핸들러에는 전달되지 않습니다.

use super::types::HubEvent;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

/// 기본 구독 우선순위 (낮을수록 먼저 실행)
pub const DEFAULT_PRIORITY: i32 = 100;

// ============================================================================
// EventHandler Trait
// ============================================================================

/// 구독 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscription-{}", self.0)
    }
}

/// 이벤트 핸들러 trait
///
/// `Ok(Some(reply))`를 돌려주면 발행자에게 응답으로 수집됩니다.
/// `Ok(None)`은 "이 핸들러와 무관함"을 뜻합니다.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// 핸들러 이름 (디버깅용)
    fn name(&self) -> &str;

    /// 이벤트 처리
    async fn handle(&self, event: &HubEvent) -> Result<Option<Value>>;
}

// ============================================================================
// Subscription
// ============================================================================

/// 이벤트 조건자
pub type EventPredicate = Arc<dyn Fn(&HubEvent) -> bool + Send + Sync>;

/// 타입이 있는 구독 레코드
#[derive(Clone)]
pub struct Subscription {
    /// 정확히 일치해야 하는 토픽
    pub topic: String,

    /// 실행 우선순위
    pub priority: i32,

    predicates: Vec<EventPredicate>,
}

impl Subscription {
    /// 토픽 구독 생성
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            priority: DEFAULT_PRIORITY,
            predicates: Vec::new(),
        }
    }

    /// 우선순위 설정
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 임의의 조건 추가
    pub fn when(mut self, predicate: impl Fn(&HubEvent) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// `source.user.username` 조건
    pub fn from_user(self, username: impl Into<String>) -> Self {
        let username = username.into();
        self.when(move |event| event.username() == Some(username.as_str()))
    }

    /// `data.actionIdentifier` 조건
    pub fn with_action(self, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        self.when(move |event| event.data_str("actionIdentifier") == Some(identifier.as_str()))
    }

    /// 이벤트가 구독 조건을 모두 만족하는지 확인
    pub fn matches(&self, event: &HubEvent) -> bool {
        event.topic == self.topic && self.predicates.iter().all(|p| p(event))
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("priority", &self.priority)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

// ============================================================================
// EventBus
// ============================================================================

/// 이벤트 버스 설정
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// 이벤트 히스토리 보관 개수
    pub history_size: usize,

    /// 디버그 모드 (모든 이벤트 로깅)
    pub debug_mode: bool,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            history_size: 100,
            debug_mode: false,
        }
    }
}

/// 등록된 핸들러 정보
struct Registered {
    id: SubscriptionId,
    subscription: Subscription,
    handler: Arc<dyn EventHandler>,
}

/// 이벤트 버스
///
/// ## 사용법
///
/// ```ignore
/// let bus = EventBus::new();
///
/// let id = bus
///     .subscribe(Subscription::topic(topics::ACTION_DISCOVER), handler)
///     .await;
///
/// let event = HubEvent::new(topics::ACTION_DISCOVER);
/// let replies = bus.publish(&event).await;
///
/// bus.unsubscribe(id).await;
/// ```
pub struct EventBus {
    /// 설정
    config: EventBusConfig,

    /// 등록된 핸들러
    handlers: RwLock<Vec<Registered>>,

    /// 구독 ID 카운터
    counter: AtomicU64,

    /// 이벤트 히스토리
    history: RwLock<Vec<HubEvent>>,

    /// 발행된 이벤트 수
    event_count: AtomicU64,
}

impl EventBus {
    /// 기본 설정으로 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// 커스텀 설정으로 이벤트 버스 생성
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            config,
            handlers: RwLock::new(Vec::new()),
            counter: AtomicU64::new(0),
            history: RwLock::new(Vec::new()),
            event_count: AtomicU64::new(0),
        }
    }

    /// 핸들러 등록
    pub async fn subscribe(
        &self,
        subscription: Subscription,
        handler: Arc<dyn EventHandler>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.counter.fetch_add(1, Ordering::SeqCst));

        debug!(
            handler = handler.name(),
            subscription_id = %id,
            topic = %subscription.topic,
            priority = subscription.priority,
            "Registering event handler"
        );

        let mut handlers = self.handlers.write().await;
        handlers.push(Registered {
            id,
            subscription,
            handler,
        });

        id
    }

    /// 핸들러 해제
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().await;
        let before = handlers.len();
        handlers.retain(|r| r.id != id);
        let removed = handlers.len() != before;

        if removed {
            debug!(subscription_id = %id, "Unregistered event handler");
        }

        removed
    }

    /// 이벤트 발행
    ///
    /// 조건을 만족하는 핸들러를 우선순위 순서로 실행하고 응답을 모읍니다.
    /// 핸들러 에러는 로그만 남기고 다음 핸들러로 진행합니다.
    pub async fn publish(&self, event: &HubEvent) -> Vec<Value> {
        let event_count = self.event_count.fetch_add(1, Ordering::SeqCst);

        if self.config.debug_mode {
            trace!(
                event_id = %event.id,
                topic = %event.topic,
                "Publishing event #{}", event_count + 1
            );
        }

        // 히스토리에 추가
        {
            let mut history = self.history.write().await;
            history.push(event.clone());

            if history.len() > self.config.history_size {
                history.remove(0);
            }
        }

        // 락을 잡은 채로 핸들러를 실행하지 않도록 스냅샷
        let mut targets: Vec<(SubscriptionId, i32, Arc<dyn EventHandler>)> = {
            let handlers = self.handlers.read().await;
            handlers
                .iter()
                .filter(|r| r.subscription.matches(event))
                .map(|r| (r.id, r.subscription.priority, r.handler.clone()))
                .collect()
        };
        targets.sort_by_key(|(id, priority, _)| (*priority, *id));

        let mut replies = Vec::new();
        for (id, _, handler) in targets {
            trace!(
                subscription_id = %id,
                handler = handler.name(),
                topic = %event.topic,
                "Delivering event to handler"
            );

            match handler.handle(event).await {
                Ok(Some(reply)) => replies.push(reply),
                Ok(None) => {}
                Err(e) => {
                    error!(
                        handler = handler.name(),
                        topic = %event.topic,
                        error = %e,
                        "Event handler failed"
                    );
                }
            }

            if event.is_stopped() {
                debug!(handler = handler.name(), topic = %event.topic, "Event stopped");
                break;
            }
        }

        replies
    }

    /// 최근 이벤트 히스토리 조회 (최신순)
    pub async fn history(&self, limit: Option<usize>) -> Vec<HubEvent> {
        let history = self.history.read().await;
        let limit = limit.unwrap_or(history.len());
        history.iter().rev().take(limit).cloned().collect()
    }

    /// 등록된 핸들러 수
    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }

    /// 총 발행된 이벤트 수
    pub fn event_count(&self) -> u64 {
        self.event_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================
