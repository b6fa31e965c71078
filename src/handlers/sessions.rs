use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{
    CloseSessionRequest, CreateSessionRequest, CreateSessionResponse, ErrorResponse,
    GetSessionInfoResponse, JoinSessionRequest, JoinSessionResponse, LeaveSessionRequest,
};
use crate::state::AppState;

/// Create a collaboration session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateSessionRequest>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_info = state
        .sessions
        .create_session(&request.project_name, &request.creator_id, request.metadata)
        .await;

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session_info.session_id.clone(),
            session_info,
        }),
    )
}

/// Join (or rejoin) a session
pub async fn join_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<JoinSessionRequest>,
) -> Result<Json<JoinSessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (session_info, active_users) = state
        .sessions
        .join_session(
            &session_id,
            &request.user_id,
            &request.client_type,
            request.client_metadata,
        )
        .await
        .map_err(Into::<(StatusCode, Json<ErrorResponse>)>::into)?;

    Ok(Json(JoinSessionResponse {
        session_info,
        active_users,
    }))
}

/// Leave a session; leaving twice (or without joining) is a no-op success
pub async fn leave_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<LeaveSessionRequest>,
) -> StatusCode {
    state.sessions.leave_session(&session_id, &request.user_id).await;
    StatusCode::NO_CONTENT
}

/// Fetch session info and the active user list
pub async fn get_session_info(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<GetSessionInfoResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (session_info, active_users) = state
        .sessions
        .get_session_info(&session_id)
        .await
        .map_err(Into::<(StatusCode, Json<ErrorResponse>)>::into)?;

    Ok(Json(GetSessionInfoResponse {
        session_info,
        active_users,
    }))
}

/// Close a session and drop its users, subscriptions and event history
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<CloseSessionRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .sessions
        .close_session(&session_id, &request.user_id)
        .await
        .map_err(Into::<(StatusCode, Json<ErrorResponse>)>::into)?;
    state.events.cleanup_session(&session_id).await;
    Ok(StatusCode::NO_CONTENT)
}
