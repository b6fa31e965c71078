use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Closed,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionInfo {
    pub session_id: String,
    pub project_name: String,
    pub creator_id: String,
    pub created_time: i64,
    pub status: SessionStatus,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Online,
    Offline,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct UserInfo {
    pub user_id: String,
    pub display_name: String,
    pub client_type: String,
    pub joined_time: i64,
    pub status: UserStatus,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventType {
    UserJoined,
    UserLeft,
    SessionClosed,
}

/// Membership change broadcast to session-event subscribers
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionEvent {
    pub event_type: SessionEventType,
    pub session_id: String,
    pub user_id: String,
    pub timestamp: i64,
}
