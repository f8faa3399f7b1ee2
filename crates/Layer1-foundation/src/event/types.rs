//! Event Types - Hub 이벤트 타입 정의
//!
//! Hub 이벤트 버스에서 오가는 이벤트와 토픽 상수를 정의합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};

// ============================================================================
// Topics
// ============================================================================

/// 잘 알려진 Hub 토픽
pub mod topics {
    /// action 메뉴 항목 요청
    pub const ACTION_DISCOVER: &str = "ftrack.action.discover";
    /// action 실행 요청
    pub const ACTION_LAUNCH: &str = "ftrack.action.launch";
    /// 플러그인 디버그 정보 브로드캐스트
    pub const PLUGIN_DEBUG_INFORMATION: &str = "ftrack.connect.plugin.debug-information";
}

// ============================================================================
// Event ID
// ============================================================================

/// 이벤트 고유 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    /// 새 이벤트 ID 생성
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Event Source
// ============================================================================

/// 이벤트를 보낸 사용자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUser {
    pub username: String,
}

/// 이벤트 발신자 (opaque origin token)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<EventUser>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}

impl EventSource {
    /// 사용자 이름으로 발신자 생성
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user: Some(EventUser {
                username: username.into(),
            }),
            application_id: None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

// ============================================================================
// HubEvent - 핵심 이벤트 타입
// ============================================================================

/// Hub 이벤트
///
/// 핸들러는 `data`를 읽고, 필요하면 `stop()`으로 이후 리스너 전달을 막습니다.
#[derive(Debug, Serialize, Deserialize)]
pub struct HubEvent {
    /// 이벤트 ID
    pub id: EventId,

    /// 토픽 (예: "ftrack.action.discover")
    pub topic: String,

    /// payload (selection, applicationIdentifier, ...)
    pub data: Value,

    /// 발신자
    #[serde(default)]
    pub source: EventSource,

    /// 발생 시간
    pub timestamp: DateTime<Utc>,

    /// stop() 호출 횟수
    #[serde(skip)]
    stop_count: AtomicU32,
}

impl HubEvent {
    /// 새 이벤트 생성
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            topic: topic.into(),
            data: Value::Object(Default::default()),
            source: EventSource::default(),
            timestamp: Utc::now(),
            stop_count: AtomicU32::new(0),
        }
    }

    /// payload 설정
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// 발신자 설정
    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    /// 이후 리스너로의 전달 중단 (exclusive handling)
    pub fn stop(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_count() > 0
    }

    pub fn stop_count(&self) -> u32 {
        self.stop_count.load(Ordering::SeqCst)
    }

    /// 발신 사용자 이름
    pub fn username(&self) -> Option<&str> {
        self.source.username()
    }

    /// payload 문자열 필드 조회
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

impl Clone for HubEvent {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            topic: self.topic.clone(),
            data: self.data.clone(),
            source: self.source.clone(),
            timestamp: self.timestamp,
            stop_count: AtomicU32::new(self.stop_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stop_flag() {
        let event = HubEvent::new(topics::ACTION_LAUNCH);
        assert!(!event.is_stopped());
        event.stop();
        assert!(event.is_stopped());
        assert_eq!(event.stop_count(), 1);
        assert!(event.clone().is_stopped());
    }

    #[test]
    fn test_source_username() {
        let event = HubEvent::new(topics::ACTION_DISCOVER)
            .with_source(EventSource::user("jane"))
            .with_data(json!({"actionIdentifier": "x"}));

        assert_eq!(event.username(), Some("jane"));
        assert_eq!(event.data_str("actionIdentifier"), Some("x"));
        assert_eq!(event.data_str("missing"), None);
    }
}
