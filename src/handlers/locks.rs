use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::session_api::parse_csv;
use crate::models::{
    ErrorResponse, GetEntityLocksQuery, GetEntityLocksResponse, LockEntityRequest,
    LockEntityResponse, UnlockEntityRequest,
};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Acquire an advisory lock; conflicts when another user holds one
pub async fn lock_entity(
    State(state): State<Arc<AppState>>,
    Path((session_id, entity_id)): Path<(String, String)>,
    Json(request): Json<LockEntityRequest>,
) -> Result<Json<LockEntityResponse>, ApiError> {
    let lock_info = state
        .scene_data
        .lock_entity(&session_id, &request.user_id, &entity_id, request.lock_type)
        .await
        .map_err(Into::<ApiError>::into)?;
    Ok(Json(LockEntityResponse { lock_info }))
}

/// Release a lock; only the holder may, absent locks release silently
pub async fn unlock_entity(
    State(state): State<Arc<AppState>>,
    Path((session_id, entity_id)): Path<(String, String)>,
    Json(request): Json<UnlockEntityRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .scene_data
        .unlock_entity(&session_id, &request.user_id, &entity_id)
        .await
        .map_err(Into::<ApiError>::into)?;
    Ok(StatusCode::NO_CONTENT)
}

/// All session locks, or the subset for the given comma-separated ids
pub async fn get_entity_locks(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<GetEntityLocksQuery>,
) -> Json<GetEntityLocksResponse> {
    let entity_ids = parse_csv(query.entity_ids.as_deref());
    let locks = state
        .scene_data
        .get_entity_locks(&session_id, &entity_ids)
        .await;
    Json(GetEntityLocksResponse { locks })
}
