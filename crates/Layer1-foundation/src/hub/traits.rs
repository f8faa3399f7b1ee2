//! Hub Session - 세션 인터페이스 정의
//!
//! Hub 데이터 세션은 외부 협력자입니다. Layer2 이상은 이 trait만 보고
//! 동작하며, 실제 구현(원격 API, 테스트용 메모리 세션)은 주입됩니다.

use super::types::{Entity, ENTITY_TASK};
use crate::{Error, Result};

// ============================================================================
// HubSession Trait - Hub 데이터 세션
// ============================================================================

/// Hub 데이터 세션
pub trait HubSession: Send + Sync {
    /// 현재 인증된 API 사용자 이름
    fn api_user(&self) -> &str;

    /// 타입과 id로 엔티티 조회 (없거나 타입이 다르면 None)
    fn get(&self, entity_type: &str, id: &str) -> Result<Option<Entity>>;

    /// 부모 체인 조회 (가까운 부모부터 루트까지)
    fn parents(&self, id: &str) -> Result<Vec<Entity>>;

    /// 직계 자식 조회 (`None`이면 최상위 엔티티)
    fn children(&self, parent_id: Option<&str>) -> Result<Vec<Entity>>;

    /// Task를 정확히 하나 조회 (없으면 NotFound)
    fn query_task(&self, id: &str) -> Result<Entity> {
        self.get(ENTITY_TASK, id)?
            .ok_or_else(|| Error::not_found(ENTITY_TASK, id))
    }

    /// 엔티티 타입과 무관하게 id로 조회
    fn find(&self, id: &str) -> Result<Option<Entity>>;
}
