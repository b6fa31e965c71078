use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Create a collaboration session
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = CreateSessionResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_session_doc() {}

/// Join an existing session
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/join",
    request_body = JoinSessionRequest,
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Joined", body = JoinSessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn join_session_doc() {}

/// Create a scene entity
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/entities",
    request_body = CreateEntityRequest,
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 201, description = "Entity created", body = CreateEntityResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_entity_doc() {}

/// Query scene entities with conjunctive filters
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/entities/query",
    request_body = QueryEntitiesRequest,
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Matching entities", body = QueryEntitiesResponse)
    )
)]
#[allow(dead_code)]
pub async fn query_entities_doc() {}

/// Acquire an advisory entity lock
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/entities/{entity_id}/lock",
    request_body = LockEntityRequest,
    params(
        ("session_id" = String, Path, description = "Session identifier"),
        ("entity_id" = String, Path, description = "Entity identifier")
    ),
    responses(
        (status = 200, description = "Lock acquired", body = LockEntityResponse),
        (status = 409, description = "Locked by another user", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn lock_entity_doc() {}

/// Publish a scene change event
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/events",
    request_body = PublishEventRequest,
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Event published", body = PublishEventResponse)
    )
)]
#[allow(dead_code)]
pub async fn publish_event_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        create_session_doc,
        join_session_doc,
        create_entity_doc,
        query_entities_doc,
        lock_entity_doc,
        publish_event_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            DiagnosticsResponse,
            SessionInfo,
            SessionStatus,
            UserInfo,
            UserStatus,
            SessionEvent,
            SessionEventType,
            SceneEntity,
            EntityMetadata,
            Transform,
            Vector3,
            Quaternion,
            PropertyValue,
            SceneData,
            SceneMetadata,
            EntityLock,
            LockType,
            SceneChangeEvent,
            SceneChangeType,
            EventFilter,
            CreateSessionRequest,
            CreateSessionResponse,
            JoinSessionRequest,
            JoinSessionResponse,
            LeaveSessionRequest,
            CloseSessionRequest,
            GetSessionInfoResponse,
            GetSceneDataResponse,
            UpdateSceneDataRequest,
            UpdateSceneDataResponse,
            CreateEntityRequest,
            CreateEntityResponse,
            UpdateEntityRequest,
            UpdateEntityResponse,
            DeleteEntityResponse,
            GetEntityResponse,
            EntityQuery,
            QueryEntitiesRequest,
            QueryEntitiesResponse,
            OperationType,
            BatchOperation,
            BatchUpdateRequest,
            BatchUpdateResponse,
            OperationResult,
            LockEntityRequest,
            LockEntityResponse,
            UnlockEntityRequest,
            GetEntityLocksResponse,
            PublishEventRequest,
            PublishEventResponse,
            GetEventHistoryResponse,
        )
    ),
    tags(
        (name = "api", description = "Collaborative scene synchronization endpoints")
    )
)]
pub struct ApiDoc;
