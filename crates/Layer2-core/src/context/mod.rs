//! Context Selector - 현재 작업 엔티티 선택
//!
//! 화면과 무관한 모델입니다. 현재 엔티티, 경로 표시 문자열, 변경 알림을
//! 관리하고, 실제 탐색 UI는 `EntityBrowser` 구현(CLI의 터미널 브라우저 등)에
//! 맡깁니다.

use mayaconnect_foundation::{Entity, Error, HostEnvironment, HubSession, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// 경로 표시 구분자
pub const PATH_SEPARATOR: &str = " / ";

/// 엔티티 변경 콜백
pub type EntityChangedCallback = Box<dyn Fn(Option<&Entity>) + Send + Sync>;

// ============================================================================
// EntityBrowser Trait
// ============================================================================

/// 모달 엔티티 탐색기
pub trait EntityBrowser {
    /// 시작 위치 설정 (루트부터 잎까지의 id)
    fn set_location(&mut self, location: Vec<String>);

    /// 탐색기 실행
    ///
    /// `can_accept`가 true인 선택에서만 수락할 수 있습니다.
    /// 수락하면 true, 취소하면 false.
    fn exec(&mut self, can_accept: &dyn Fn(&[Entity]) -> bool) -> Result<bool>;

    /// 수락된 선택
    fn selected(&self) -> Vec<Entity>;
}

// ============================================================================
// ContextSelector
// ============================================================================

/// 현재 작업 엔티티 선택 모델
pub struct ContextSelector {
    session: Arc<dyn HubSession>,
    entity: Option<Entity>,
    on_changed: Option<EntityChangedCallback>,
}

impl ContextSelector {
    pub fn new(session: Arc<dyn HubSession>) -> Self {
        Self {
            session,
            entity: None,
            on_changed: None,
        }
    }

    /// 변경 알림 등록 (기존 콜백은 교체)
    pub fn on_entity_changed(&mut self, callback: impl Fn(Option<&Entity>) + Send + Sync + 'static) {
        self.on_changed = Some(Box::new(callback));
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    /// 엔티티 설정 후 알림
    pub fn set_entity(&mut self, entity: Option<Entity>) {
        debug!(entity = ?entity.as_ref().map(|e| e.id.as_str()), "Context entity changed");
        self.entity = entity;
        if let Some(callback) = &self.on_changed {
            callback(self.entity.as_ref());
        }
    }

    /// 환경 변수(FTRACK_TASKID, 없으면 FTRACK_SHOTID)로 초기화
    pub fn reset(&mut self, env: &HostEnvironment) -> Result<()> {
        let entity = match env.current_entity_id() {
            Some(id) => Some(
                self.session
                    .find(id)?
                    .ok_or_else(|| Error::not_found("Context", id))?,
            ),
            None => None,
        };
        self.set_entity(entity);
        Ok(())
    }

    /// 경로 표시 문자열 (루트부터)
    pub fn path_text(&self) -> Result<String> {
        let Some(entity) = &self.entity else {
            return Ok(String::new());
        };

        let mut names: Vec<String> = self
            .session
            .parents(&entity.id)?
            .iter()
            .rev()
            .map(|e| e.display_name().to_string())
            .collect();
        names.push(entity.display_name().to_string());

        Ok(names.join(PATH_SEPARATOR))
    }

    /// 탐색기 실행
    ///
    /// 현재 엔티티의 부모 체인으로 시작 위치를 잡고, 수락되면 첫 번째
    /// 선택으로 엔티티를 바꿉니다 (빈 선택이면 None).
    pub fn browse(&mut self, browser: &mut dyn EntityBrowser) -> Result<bool> {
        if let Some(entity) = &self.entity {
            let location: Vec<String> = self
                .session
                .parents(&entity.id)?
                .into_iter()
                .rev()
                .map(|e| e.id)
                .collect();
            browser.set_location(location);
        }

        let accepted = browser.exec(&|selection| self.can_accept(selection))?;
        if accepted {
            self.set_entity(browser.selected().into_iter().next());
        }

        Ok(accepted)
    }

    /// 수락 가능 여부
    ///
    /// 하나만 선택되어야 하고, Project나 Project 바로 아래의 Task는 고를 수 없습니다.
    pub fn can_accept(&self, selection: &[Entity]) -> bool {
        let [entity] = selection else {
            return false;
        };
        if entity.is_project() {
            return false;
        }
        if !entity.is_task() {
            return true;
        }

        let Some(parent_id) = entity.parent_id.as_deref() else {
            return true;
        };
        match self.session.find(parent_id) {
            Ok(parent) => !parent.is_some_and(|p| p.is_project()),
            Err(e) => {
                warn!(entity = %entity.id, "Failed to resolve parent: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for ContextSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextSelector")
            .field("entity", &self.entity)
            .field("has_observer", &self.on_changed.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use std::sync::Mutex;

    fn session() -> Arc<MemorySession> {
        Arc::new(MemorySession::new("alice").with_entities(vec![
            Entity::new("p1", "Project").name("show"),
            Entity::new("pt", "Task").name("design").parent("p1"),
            Entity::new("q1", "Sequence").name("sq01").parent("p1"),
            Entity::new("s1", "Shot").name("sh010").parent("q1"),
            Entity::new("t1", "Task").name("anim").parent("s1"),
        ]))
    }

    fn entity(id: &str) -> Entity {
        session().find(id).unwrap().unwrap()
    }

    /// 미리 정한 선택을 돌려주는 탐색기
    struct ScriptedBrowser {
        location: Vec<String>,
        pick: Vec<Entity>,
        accept: bool,
        allowed: Option<bool>,
    }

    impl EntityBrowser for ScriptedBrowser {
        fn set_location(&mut self, location: Vec<String>) {
            self.location = location;
        }

        fn exec(&mut self, can_accept: &dyn Fn(&[Entity]) -> bool) -> Result<bool> {
            let allowed = can_accept(&self.pick);
            self.allowed = Some(allowed);
            Ok(self.accept && allowed)
        }

        fn selected(&self) -> Vec<Entity> {
            self.pick.clone()
        }
    }

    #[test]
    fn test_reset_prefers_task_then_shot() {
        let mut selector = ContextSelector::new(session());

        selector
            .reset(&HostEnvironment {
                task_id: Some("t1".to_string()),
                shot_id: Some("s1".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(selector.entity().map(|e| e.id.as_str()), Some("t1"));

        selector
            .reset(&HostEnvironment {
                shot_id: Some("s1".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(selector.entity().map(|e| e.id.as_str()), Some("s1"));
    }

    #[test]
    fn test_reset_unknown_entity_is_not_found() {
        let mut selector = ContextSelector::new(session());
        let err = selector
            .reset(&HostEnvironment {
                task_id: Some("ghost".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_observer_notified() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut selector = ContextSelector::new(session());
        selector.on_entity_changed(move |entity| {
            sink.lock().unwrap().push(entity.map(|e| e.id.clone()));
        });

        selector.set_entity(Some(entity("t1")));
        selector.set_entity(None);

        assert_eq!(*seen.lock().unwrap(), vec![Some("t1".to_string()), None]);
    }

    #[test]
    fn test_path_text() {
        let mut selector = ContextSelector::new(session());
        assert_eq!(selector.path_text().unwrap(), "");

        selector.set_entity(Some(entity("t1")));
        assert_eq!(selector.path_text().unwrap(), "show / sq01 / sh010 / anim");
    }

    #[test]
    fn test_can_accept_rules() {
        let selector = ContextSelector::new(session());

        assert!(selector.can_accept(&[entity("t1")]));
        assert!(selector.can_accept(&[entity("s1")]));
        assert!(!selector.can_accept(&[entity("p1")]));
        assert!(!selector.can_accept(&[entity("pt")]));
        assert!(!selector.can_accept(&[]));
        assert!(!selector.can_accept(&[entity("t1"), entity("s1")]));
    }

    #[test]
    fn test_browse_seeds_location_and_applies_selection() {
        let mut selector = ContextSelector::new(session());
        selector.set_entity(Some(entity("t1")));

        let mut browser = ScriptedBrowser {
            location: Vec::new(),
            pick: vec![entity("s1")],
            accept: true,
            allowed: None,
        };

        assert!(selector.browse(&mut browser).unwrap());
        assert_eq!(browser.location, vec!["p1", "q1", "s1"]);
        assert_eq!(browser.allowed, Some(true));
        assert_eq!(selector.entity().map(|e| e.id.as_str()), Some("s1"));
    }

    #[test]
    fn test_browse_cancel_keeps_entity() {
        let mut selector = ContextSelector::new(session());
        selector.set_entity(Some(entity("t1")));

        let mut browser = ScriptedBrowser {
            location: Vec::new(),
            pick: vec![entity("pt")],
            accept: true,
            allowed: None,
        };

        assert!(!selector.browse(&mut browser).unwrap());
        assert_eq!(browser.allowed, Some(false));
        assert_eq!(selector.entity().map(|e| e.id.as_str()), Some("t1"));
    }

    #[test]
    fn test_browse_empty_selection_clears_entity() {
        let mut selector = ContextSelector::new(session());
        selector.set_entity(Some(entity("t1")));

        struct EmptyBrowser;
        impl EntityBrowser for EmptyBrowser {
            fn set_location(&mut self, _location: Vec<String>) {}
            fn exec(&mut self, _can_accept: &dyn Fn(&[Entity]) -> bool) -> Result<bool> {
                Ok(true)
            }
            fn selected(&self) -> Vec<Entity> {
                Vec::new()
            }
        }

        assert!(selector.browse(&mut EmptyBrowser).unwrap());
        assert!(selector.entity().is_none());
    }
}
