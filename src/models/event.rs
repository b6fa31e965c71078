use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SceneChangeType {
    EntityAdded,
    EntityRemoved,
    EntityModified,
    TransformChanged,
    PropertyChanged,
    SceneUpdated,
}

/// Immutable record of a past scene change. Carries identity only;
/// consumers re-fetch full entity state.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SceneChangeEvent {
    pub change_type: SceneChangeType,
    #[serde(default)]
    pub entity_id: String,
    /// Entity type at the time of the change, when known. Used by the
    /// entity_types subscription filter.
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub user_id: String,
    /// Unix seconds; 0 on publish means "stamp with the current time"
    #[serde(default)]
    pub timestamp: i64,
}

/// Subscription filter; empty vectors are no-ops
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct EventFilter {
    #[serde(default)]
    pub entity_ids: Vec<String>,
    #[serde(default)]
    pub entity_types: Vec<String>,
    #[serde(default)]
    pub user_ids: Vec<String>,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        self.entity_ids.is_empty() && self.entity_types.is_empty() && self.user_ids.is_empty()
    }
}
