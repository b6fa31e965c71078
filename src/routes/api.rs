use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    batch_update, close_session, create_entity, create_session, delete_entity, diagnostics,
    get_entity, get_entity_locks, get_event_history, get_scene_data, get_session_info,
    health_check, join_session, leave_session, lock_entity, publish_event, query_entities,
    ready_check, unlock_entity, update_entity, update_scene_data,
};
use crate::state::AppState;
use crate::ws::{scene_events_ws, session_events_ws};

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health_check))
        .route("/v1/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        // Session service
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/:session_id", get(get_session_info))
        .route("/v1/sessions/:session_id/join", post(join_session))
        .route("/v1/sessions/:session_id/leave", post(leave_session))
        .route("/v1/sessions/:session_id/close", post(close_session))
        .route(
            "/v1/sessions/:session_id/events/subscribe",
            get(session_events_ws),
        )
        // Scene data service
        .route("/v1/sessions/:session_id/scene", get(get_scene_data))
        .route("/v1/sessions/:session_id/scene", put(update_scene_data))
        .route("/v1/sessions/:session_id/entities", post(create_entity))
        .route(
            "/v1/sessions/:session_id/entities/query",
            post(query_entities),
        )
        .route(
            "/v1/sessions/:session_id/entities/batch",
            post(batch_update),
        )
        .route(
            "/v1/sessions/:session_id/entities/:entity_id",
            get(get_entity),
        )
        .route(
            "/v1/sessions/:session_id/entities/:entity_id",
            put(update_entity),
        )
        .route(
            "/v1/sessions/:session_id/entities/:entity_id",
            delete(delete_entity),
        )
        .route(
            "/v1/sessions/:session_id/entities/:entity_id/lock",
            post(lock_entity),
        )
        .route(
            "/v1/sessions/:session_id/entities/:entity_id/unlock",
            post(unlock_entity),
        )
        .route("/v1/sessions/:session_id/locks", get(get_entity_locks))
        // Event stream service
        .route("/v1/sessions/:session_id/events", post(publish_event))
        .route(
            "/v1/sessions/:session_id/events/history",
            get(get_event_history),
        )
        .route(
            "/v1/sessions/:session_id/events/stream",
            get(scene_events_ws),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_api_routes(AppState::new(Config::default()))
    }

    async fn request(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn full_collaboration_flow() {
        let app = app();

        let (status, body) = request(
            &app,
            "POST",
            "/v1/sessions",
            Some(json!({"project_name": "P", "creator_id": "U1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let (status, _) = request(
            &app,
            "POST",
            &format!("/v1/sessions/{}/join", session_id),
            Some(json!({"user_id": "U1", "client_type": "Go"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = request(
            &app,
            "POST",
            &format!("/v1/sessions/{}/entities", session_id),
            Some(json!({"user_id": "U1", "entity": {"name": "E1", "entity_type": "Mesh"}})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let entity_id = body["entity_id"].as_str().unwrap().to_string();
        assert!(!entity_id.is_empty());
        // First version issued in a fresh process
        assert_eq!(body["version"], 1);

        let (status, body) = request(
            &app,
            "GET",
            &format!("/v1/sessions/{}/entities/{}", session_id, entity_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entity"]["name"], "E1");
        assert_eq!(body["entity"]["entity_type"], "Mesh");

        let (status, _) = request(
            &app,
            "DELETE",
            &format!("/v1/sessions/{}/entities/{}?user_id=U1", session_id, entity_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = request(
            &app,
            "GET",
            &format!("/v1/sessions/{}/entities/{}", session_id, entity_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn join_unknown_session_is_not_found() {
        let app = app();
        let (status, body) = request(
            &app,
            "POST",
            "/v1/sessions/missing/join",
            Some(json!({"user_id": "U1"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn lock_conflict_maps_to_conflict_status() {
        let app = app();
        let (_, body) = request(
            &app,
            "POST",
            "/v1/sessions",
            Some(json!({"project_name": "P", "creator_id": "U1"})),
        )
        .await;
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let (status, _) = request(
            &app,
            "POST",
            &format!("/v1/sessions/{}/entities/e1/lock", session_id),
            Some(json!({"user_id": "userA", "lock_type": "exclusive"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = request(
            &app,
            "POST",
            &format!("/v1/sessions/{}/entities/e1/lock", session_id),
            Some(json!({"user_id": "userB", "lock_type": "exclusive"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);

        let (status, _) = request(
            &app,
            "POST",
            &format!("/v1/sessions/{}/entities/e1/unlock", session_id),
            Some(json!({"user_id": "userB"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn batch_update_reports_per_operation_results() {
        let app = app();
        let (_, body) = request(
            &app,
            "POST",
            "/v1/sessions",
            Some(json!({"project_name": "P", "creator_id": "U1"})),
        )
        .await;
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let (status, body) = request(
            &app,
            "POST",
            &format!("/v1/sessions/{}/entities/batch", session_id),
            Some(json!({
                "user_id": "U1",
                "operations": [
                    {"operation_type": "create", "entity": {"name": "A", "entity_type": "Mesh"}},
                    {"operation_type": "update", "entity": {"entity_id": "missing", "name": "B"}}
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["success"], true);
        assert_eq!(body["results"][1]["success"], false);

        let created_id = body["results"][0]["entity_id"].as_str().unwrap();
        let (status, _) = request(
            &app,
            "GET",
            &format!("/v1/sessions/{}/entities/{}", session_id, created_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
