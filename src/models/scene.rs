use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::SceneEntity;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct SceneMetadata {
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub modified_by: String,
    #[serde(default)]
    pub modified_time: i64,
}

/// A session's scene record: name, entity snapshot and version
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SceneData {
    pub scene_id: String,
    pub name: String,
    #[serde(default)]
    pub entities: Vec<SceneEntity>,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub metadata: SceneMetadata,
}
