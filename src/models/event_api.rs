use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::session_api::{parse_csv, parse_csv_enum};
use crate::models::{EventFilter, SceneChangeEvent, SceneChangeType};

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct PublishEventRequest {
    pub user_id: String,
    pub event: SceneChangeEvent,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct PublishEventResponse {
    pub delivered: usize,
}

#[derive(Deserialize, Debug, Default)]
pub struct EventHistoryQuery {
    /// Inclusive unix-second bounds; 0 = unbounded
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub end_time: i64,
    /// Comma-separated change types; empty = all
    #[serde(default)]
    pub event_types: Option<String>,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl EventHistoryQuery {
    pub fn parsed_event_types(&self) -> Vec<SceneChangeType> {
        parse_csv_enum(self.event_types.as_deref())
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct GetEventHistoryResponse {
    pub events: Vec<SceneChangeEvent>,
    pub total_count: usize,
}

/// Query parameters for the scene-event WebSocket subscription
#[derive(Deserialize, Debug)]
pub struct SubscribeEventsQuery {
    pub user_id: String,
    /// Comma-separated change types; empty = all
    #[serde(default)]
    pub event_types: Option<String>,
    #[serde(default)]
    pub entity_ids: Option<String>,
    #[serde(default)]
    pub entity_types: Option<String>,
    #[serde(default)]
    pub user_ids: Option<String>,
}

impl SubscribeEventsQuery {
    pub fn parsed_event_types(&self) -> Vec<SceneChangeType> {
        parse_csv_enum(self.event_types.as_deref())
    }

    pub fn parsed_filter(&self) -> Option<EventFilter> {
        let filter = EventFilter {
            entity_ids: parse_csv(self.entity_ids.as_deref()),
            entity_types: parse_csv(self.entity_types.as_deref()),
            user_ids: parse_csv(self.user_ids.as_deref()),
        };
        if filter.is_empty() {
            None
        } else {
            Some(filter)
        }
    }
}
