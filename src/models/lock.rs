use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LockType {
    Exclusive,
    Shared,
}

/// Advisory reservation of an entity by a user. Single holder per entity;
/// never expires automatically (expires_time is reserved, 0 = never).
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct EntityLock {
    pub entity_id: String,
    pub user_id: String,
    pub lock_type: LockType,
    pub acquired_time: i64,
    #[serde(default)]
    pub expires_time: i64,
}
