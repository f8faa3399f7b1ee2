//! Event System - Hub 이벤트 발행/구독 시스템
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        EventBus                              │
//! │  publish(&event) ──▶ Subscription::matches (topic + 조건자)  │
//! │         │                                                   │
//! │         ▼  priority 순서, stop() 시 중단                     │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │  discover    │  │  launch      │  │  debug-info  │      │
//! │  └──────────────┘  └──────────────┘  └──────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod bus;
pub mod types;

pub use bus::{
    EventBus, EventBusConfig, EventHandler, EventPredicate, Subscription, SubscriptionId,
    DEFAULT_PRIORITY,
};

pub use types::{topics, EventId, EventSource, EventUser, HubEvent};
