use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::models::{
    EventHistoryQuery, GetEventHistoryResponse, PublishEventRequest, PublishEventResponse,
};
use crate::state::AppState;

/// Publish a client-originated scene change to the session's subscribers
pub async fn publish_event(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<PublishEventRequest>,
) -> Json<PublishEventResponse> {
    let delivered = state
        .events
        .publish(&session_id, &request.user_id, request.event)
        .await;
    Json(PublishEventResponse { delivered })
}

/// Filtered slice of the session's bounded event history
pub async fn get_event_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<EventHistoryQuery>,
) -> Json<GetEventHistoryResponse> {
    let event_types = query.parsed_event_types();
    let (events, total_count) = state
        .events
        .event_history(
            &session_id,
            query.start_time,
            query.end_time,
            event_types,
            query.limit,
            query.offset,
        )
        .await;
    Json(GetEventHistoryResponse {
        events,
        total_count,
    })
}
