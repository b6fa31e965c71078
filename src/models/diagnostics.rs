use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for diagnostics information
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub n_sessions: u32,
    pub n_users: u32,
    pub n_entities: u32,
    pub n_locks: u32,
    pub n_scene_subscriptions: u32,
    pub n_session_subscriptions: u32,
    pub n_history_events: u32,
    pub current_version: i64,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
