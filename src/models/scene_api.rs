use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{SceneData, SceneEntity};

#[derive(Deserialize, Debug)]
pub struct GetSceneDataQuery {
    /// Defaults to "default" when absent
    #[serde(default)]
    pub scene_id: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct GetSceneDataResponse {
    pub scene_data: SceneData,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UpdateSceneDataRequest {
    pub user_id: String,
    pub scene_data: SceneData,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UpdateSceneDataResponse {
    pub version: i64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct CreateEntityRequest {
    pub user_id: String,
    pub entity: SceneEntity,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct CreateEntityResponse {
    pub entity_id: String,
    pub version: i64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UpdateEntityRequest {
    pub user_id: String,
    pub entity: SceneEntity,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UpdateEntityResponse {
    pub version: i64,
}

#[derive(Deserialize, Debug)]
pub struct DeleteEntityQuery {
    pub user_id: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct DeleteEntityResponse {
    pub version: i64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct GetEntityResponse {
    pub entity: SceneEntity,
}

/// Conjunction of filters; empty/unset criteria are no-ops
#[derive(Serialize, Deserialize, ToSchema, Debug, Default)]
pub struct EntityQuery {
    #[serde(default)]
    pub entity_ids: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 0 = no limit
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct QueryEntitiesRequest {
    #[serde(default)]
    pub query: EntityQuery,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct QueryEntitiesResponse {
    pub entities: Vec<SceneEntity>,
    /// Filtered-but-unpaginated result size
    pub total_count: usize,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Create,
    Update,
    Delete,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct BatchOperation {
    pub operation_type: OperationType,
    pub entity: SceneEntity,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct BatchUpdateRequest {
    pub user_id: String,
    pub operations: Vec<BatchOperation>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct OperationResult {
    pub success: bool,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub entity_id: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct BatchUpdateResponse {
    pub results: Vec<OperationResult>,
    pub batch_version: i64,
}
