//! Memory Session - 메모리 기반 HubSession
//!
//! JSON fixture 파일(`{"apiUser": ..., "entities": [...]}`)에서 Hub 데이터를
//! 읽어 오프라인으로 discover/launch를 돌릴 수 있게 합니다.

use mayaconnect_foundation::{Entity, HubSession, JsonStore, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// fixture 파일 형식
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubFixture {
    #[serde(default)]
    pub api_user: String,

    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// 메모리 HubSession
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    api_user: String,
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl MemorySession {
    pub fn new(api_user: impl Into<String>) -> Self {
        Self {
            api_user: api_user.into(),
            ..Default::default()
        }
    }

    pub fn from_fixture(fixture: HubFixture) -> Self {
        Self::new(fixture.api_user).with_entities(fixture.entities)
    }

    /// fixture 파일 로드
    pub fn load(path: &Path) -> Result<Self> {
        let fixture: HubFixture = JsonStore::read_file(path)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        for entity in entities {
            self.insert(entity);
        }
        self
    }

    /// 엔티티 추가 (같은 id면 교체)
    pub fn insert(&mut self, entity: Entity) {
        match self.index.get(&entity.id) {
            Some(&i) => self.entities[i] = entity,
            None => {
                self.index.insert(entity.id.clone(), self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn lookup(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }
}

impl HubSession for MemorySession {
    fn api_user(&self) -> &str {
        &self.api_user
    }

    fn get(&self, entity_type: &str, id: &str) -> Result<Option<Entity>> {
        Ok(self
            .lookup(id)
            .filter(|e| e.entity_type == entity_type)
            .cloned())
    }

    fn parents(&self, id: &str) -> Result<Vec<Entity>> {
        let mut parents = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.lookup(id).and_then(|e| e.parent_id.as_deref());

        while let Some(parent_id) = current {
            // 잘못된 fixture의 순환 참조 방지
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.lookup(parent_id) else {
                break;
            };
            parents.push(parent.clone());
            current = parent.parent_id.as_deref();
        }

        Ok(parents)
    }

    fn children(&self, parent_id: Option<&str>) -> Result<Vec<Entity>> {
        Ok(self
            .entities
            .iter()
            .filter(|e| e.parent_id.as_deref() == parent_id)
            .cloned()
            .collect())
    }

    fn find(&self, id: &str) -> Result<Option<Entity>> {
        Ok(self.lookup(id).cloned())
    }
}
