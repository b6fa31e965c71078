use axum::{extract::State, http::StatusCode, Json};
use std::sync::{Arc, Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

use crate::models::DiagnosticsResponse;
use crate::state::AppState;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Live counters across the session, scene-data and event services plus
/// process CPU/memory stats
pub async fn diagnostics(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<DiagnosticsResponse>) {
    let n_sessions = state.sessions.session_count().await as u32;
    let n_users = state.sessions.user_count().await as u32;
    let n_session_subscriptions = state.sessions.stream_count().await as u32;
    let n_entities = state.scene_data.entity_count().await as u32;
    let n_locks = state.scene_data.lock_count().await as u32;
    let n_scene_subscriptions = state.events.subscription_count().await as u32;
    let n_history_events = state.events.history_event_count().await as u32;
    let current_version = state.versions.current();

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| Mutex::new(System::new_all()));
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0),
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB, Sessions: {}, Entities: {}, Subscriptions: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        n_sessions,
        n_entities,
        n_scene_subscriptions + n_session_subscriptions
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            n_sessions,
            n_users,
            n_entities,
            n_locks,
            n_scene_subscriptions,
            n_session_subscriptions,
            n_history_events,
            current_version,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    )
}
