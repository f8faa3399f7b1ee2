//! Hub Types - Hub 엔티티와 실행 컨텍스트
//!
//! Hub(ftrack)가 소유한 엔티티를 참조하는 타입과, launch 이벤트에서
//! 애플리케이션 실행까지 전달되는 컨텍스트를 정의합니다.

use crate::event::EventSource;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Project 엔티티 타입
pub const ENTITY_PROJECT: &str = "Project";
/// Task 엔티티 타입
pub const ENTITY_TASK: &str = "Task";
/// Shot 엔티티 타입
pub const ENTITY_SHOT: &str = "Shot";

/// action 이벤트 selection에서 task 계열을 나타내는 타입 문자열
pub const SELECTION_TASK: &str = "task";

// ============================================================================
// EntityRef - selection 항목
// ============================================================================

/// 이벤트 payload의 selection 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: String,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }

    /// task selection 생성
    pub fn task(entity_id: impl Into<String>) -> Self {
        Self::new(SELECTION_TASK, entity_id)
    }
}

// ============================================================================
// Entity - Hub 레코드
// ============================================================================

/// Hub 엔티티 (Project, Sequence, Shot, Task ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,

    /// 엔티티 타입 (예: "Task", "Shot", "Project")
    pub entity_type: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            name: String::new(),
            parent_id: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn is_project(&self) -> bool {
        self.entity_type == ENTITY_PROJECT
    }

    pub fn is_task(&self) -> bool {
        self.entity_type == ENTITY_TASK
    }

    /// 표시용 이름 (이름이 없으면 id)
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

// ============================================================================
// LaunchContext - 실행 컨텍스트
// ============================================================================

/// launch 이벤트에서 Launcher로 전달되는 컨텍스트
///
/// 이벤트 payload를 그대로 복사한 `params`와 정규화된 `selection`,
/// 이벤트를 보낸 `source`를 가집니다.
#[derive(Debug, Clone, Default)]
pub struct LaunchContext {
    pub selection: Vec<EntityRef>,
    pub params: Map<String, Value>,
    pub source: Option<EventSource>,
}

impl LaunchContext {
    pub fn new(selection: Vec<EntityRef>) -> Self {
        Self {
            selection,
            ..Default::default()
        }
    }

    /// 이벤트 payload에서 컨텍스트 생성
    ///
    /// selection 형식이 잘못되었으면 InvalidInput
    pub fn from_payload(data: &Value, source: Option<EventSource>) -> Result<Self> {
        let params = data.as_object().cloned().unwrap_or_default();
        Ok(Self {
            selection: parse_selection(data)?,
            params,
            source,
        })
    }

    /// 선택된 엔티티 (정확히 하나일 때만)
    pub fn selected(&self) -> Option<&EntityRef> {
        match self.selection.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// payload의 `selection` 배열 파싱
///
/// `selection`이 없으면 빈 목록입니다. 배열이 아니거나 항목 하나라도
/// 형식이 맞지 않으면 걸러내지 않고 selection 전체를 InvalidInput으로 봅니다.
pub fn parse_selection(data: &Value) -> Result<Vec<EntityRef>> {
    let Some(selection) = data.get("selection") else {
        return Ok(Vec::new());
    };
    let items = selection
        .as_array()
        .ok_or_else(|| Error::InvalidInput("selection is not an array".to_string()))?;

    items
        .iter()
        .map(|item| {
            EntityRef::deserialize(item)
                .map_err(|e| Error::InvalidInput(format!("Malformed selection item: {}", e)))
        })
        .collect()
}
