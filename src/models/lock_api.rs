use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{EntityLock, LockType};

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LockEntityRequest {
    pub user_id: String,
    pub lock_type: LockType,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LockEntityResponse {
    pub lock_info: EntityLock,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UnlockEntityRequest {
    pub user_id: String,
}

#[derive(Deserialize, Debug)]
pub struct GetEntityLocksQuery {
    /// Comma-separated entity ids; empty = all locks in the session
    #[serde(default)]
    pub entity_ids: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct GetEntityLocksResponse {
    pub locks: Vec<EntityLock>,
}
