use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info};

use crate::models::SubscribeEventsQuery;
use crate::state::AppState;

/// Server-streaming scene-change subscription. The connection stays open
/// until the client disconnects; each matching published event arrives as
/// one JSON text frame.
pub async fn scene_events_ws(
    Path(session_id): Path<String>,
    Query(query): Query<SubscribeEventsQuery>,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!(
        "Scene event subscription attempt: {} (user: {})",
        session_id, query.user_id
    );
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, query, state))
}

async fn handle_socket(
    socket: WebSocket,
    session_id: String,
    query: SubscribeEventsQuery,
    state: Arc<AppState>,
) {
    let event_types = query.parsed_event_types();
    let filter = query.parsed_filter();
    let (subscription_id, mut rx) = state
        .events
        .subscribe(&session_id, &query.user_id, event_types, filter)
        .await;

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(e) => {
                        error!("Failed to serialize scene event for {}: {}", session_id, e);
                        continue;
                    }
                };
                if sender.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                // Client frames are ignored; close or error ends the stream
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => continue,
                }
            }
        }
    }

    state.events.unsubscribe(&session_id, &subscription_id).await;
    info!(
        "Scene event subscription ended: {} (user: {})",
        session_id, query.user_id
    );
}
