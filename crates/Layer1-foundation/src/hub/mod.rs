//! Hub - Hub 타입과 세션 trait
//!
//! - `types.rs` - Entity, EntityRef, LaunchContext
//! - `traits.rs` - HubSession

mod traits;
mod types;

pub use traits::HubSession;
pub use types::{
    parse_selection, Entity, EntityRef, LaunchContext, ENTITY_PROJECT, ENTITY_SHOT, ENTITY_TASK,
    SELECTION_TASK,
};
