use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::models::{SessionEventType, SessionInfo, UserInfo};

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct CreateSessionRequest {
    pub project_name: String,
    pub creator_id: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub session_info: SessionInfo,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct JoinSessionRequest {
    pub user_id: String,
    #[serde(default)]
    pub client_type: String,
    #[serde(default)]
    pub client_metadata: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct JoinSessionResponse {
    pub session_info: SessionInfo,
    pub active_users: Vec<UserInfo>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LeaveSessionRequest {
    pub user_id: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct GetSessionInfoResponse {
    pub session_info: SessionInfo,
    pub active_users: Vec<UserInfo>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct CloseSessionRequest {
    pub user_id: String,
}

/// Query parameters for the session-event WebSocket subscription
#[derive(Deserialize, Debug)]
pub struct SessionEventsQuery {
    pub user_id: String,
    /// Comma-separated event types; empty = all
    #[serde(default)]
    pub event_types: Option<String>,
}

impl SessionEventsQuery {
    pub fn parsed_event_types(&self) -> Vec<SessionEventType> {
        parse_csv_enum(self.event_types.as_deref())
    }
}

/// Parse a comma-separated list of serde snake_case enum names,
/// skipping anything unknown.
pub(crate) fn parse_csv_enum<T: serde::de::DeserializeOwned>(csv: Option<&str>) -> Vec<T> {
    csv.unwrap_or_default()
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| serde_json::from_value(serde_json::Value::String(s.trim().to_string())).ok())
        .collect()
}

pub(crate) fn parse_csv(csv: Option<&str>) -> Vec<String> {
    csv.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
