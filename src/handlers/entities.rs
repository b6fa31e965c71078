use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{
    BatchUpdateRequest, BatchUpdateResponse, CreateEntityRequest, CreateEntityResponse,
    DeleteEntityQuery, DeleteEntityResponse, ErrorResponse, GetEntityResponse, GetSceneDataQuery,
    GetSceneDataResponse, QueryEntitiesRequest, QueryEntitiesResponse, UpdateEntityRequest,
    UpdateEntityResponse, UpdateSceneDataRequest, UpdateSceneDataResponse,
};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Current scene snapshot; lazily creates the default scene record
pub async fn get_scene_data(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<GetSceneDataQuery>,
) -> Json<GetSceneDataResponse> {
    let scene_data = state
        .scene_data
        .get_scene_data(&session_id, query.scene_id.as_deref())
        .await;
    Json(GetSceneDataResponse { scene_data })
}

/// Wholesale scene replace (last-writer-wins)
pub async fn update_scene_data(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<UpdateSceneDataRequest>,
) -> Json<UpdateSceneDataResponse> {
    let version = state
        .scene_data
        .update_scene_data(&session_id, &request.user_id, request.scene_data)
        .await;
    Json(UpdateSceneDataResponse { version })
}

pub async fn create_entity(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<CreateEntityRequest>,
) -> (StatusCode, Json<CreateEntityResponse>) {
    let (entity_id, version) = state
        .scene_data
        .create_entity(&session_id, &request.user_id, request.entity)
        .await;
    (
        StatusCode::CREATED,
        Json(CreateEntityResponse { entity_id, version }),
    )
}

pub async fn update_entity(
    State(state): State<Arc<AppState>>,
    Path((session_id, entity_id)): Path<(String, String)>,
    Json(request): Json<UpdateEntityRequest>,
) -> Result<Json<UpdateEntityResponse>, ApiError> {
    let mut entity = request.entity;
    // The path segment is authoritative for which record is replaced
    entity.entity_id = entity_id;
    let version = state
        .scene_data
        .update_entity(&session_id, &request.user_id, entity)
        .await
        .map_err(Into::<ApiError>::into)?;
    Ok(Json(UpdateEntityResponse { version }))
}

pub async fn delete_entity(
    State(state): State<Arc<AppState>>,
    Path((session_id, entity_id)): Path<(String, String)>,
    Query(query): Query<DeleteEntityQuery>,
) -> Result<Json<DeleteEntityResponse>, ApiError> {
    let version = state
        .scene_data
        .delete_entity(&session_id, &query.user_id, &entity_id)
        .await
        .map_err(Into::<ApiError>::into)?;
    Ok(Json(DeleteEntityResponse { version }))
}

pub async fn get_entity(
    State(state): State<Arc<AppState>>,
    Path((session_id, entity_id)): Path<(String, String)>,
) -> Result<Json<GetEntityResponse>, ApiError> {
    let entity = state
        .scene_data
        .get_entity(&session_id, &entity_id)
        .await
        .map_err(Into::<ApiError>::into)?;
    Ok(Json(GetEntityResponse { entity }))
}

/// Filtered entity query with post-count pagination
pub async fn query_entities(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<QueryEntitiesRequest>,
) -> Json<QueryEntitiesResponse> {
    let (entities, total_count) = state
        .scene_data
        .query_entities(&session_id, &request.query)
        .await;
    Json(QueryEntitiesResponse {
        entities,
        total_count,
    })
}

/// Ordered, non-atomic batch; inspect each per-operation result
pub async fn batch_update(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<BatchUpdateRequest>,
) -> Json<BatchUpdateResponse> {
    let (results, batch_version) = state
        .scene_data
        .batch_update(&session_id, &request.user_id, request.operations)
        .await;
    Json(BatchUpdateResponse {
        results,
        batch_version,
    })
}
