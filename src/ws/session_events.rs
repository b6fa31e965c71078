use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use crate::models::{ErrorResponse, SessionEvent, SessionEventsQuery};
use crate::state::AppState;

/// Server-streaming session-event subscription (user joins/leaves, close).
/// Rejected before upgrade when the session is unknown.
pub async fn session_events_ws(
    Path(session_id): Path<String>,
    Query(query): Query<SessionEventsQuery>,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let event_types = query.parsed_event_types();
    let subscription = match state
        .sessions
        .subscribe_events(&session_id, &query.user_id, event_types)
        .await
    {
        Ok(subscription) => subscription,
        Err(e) => {
            error!("Session event subscription rejected: {}", e);
            let err: (StatusCode, Json<ErrorResponse>) = e.into();
            return err.into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, session_id, query.user_id, subscription, state))
}

async fn handle_socket(
    socket: WebSocket,
    session_id: String,
    user_id: String,
    (subscription_id, mut rx): (String, UnboundedReceiver<SessionEvent>),
    state: Arc<AppState>,
) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(e) => {
                        error!("Failed to serialize session event for {}: {}", session_id, e);
                        continue;
                    }
                };
                if sender.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => continue,
                }
            }
        }
    }

    state
        .sessions
        .unsubscribe_events(&session_id, &subscription_id)
        .await;
    info!(
        "Session event stream ended: {} (user: {})",
        session_id, user_id
    );
}
