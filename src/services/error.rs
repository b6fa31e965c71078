use axum::{http::StatusCode, Json};

use crate::models::ErrorResponse;

/// Failure taxonomy shared by the session, scene-data and event services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "not found: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "conflict: {}", msg),
            ServiceError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    pub fn session_not_found(session_id: &str) -> Self {
        ServiceError::NotFound(format!("Session '{}' not found", session_id))
    }

    pub fn entity_not_found(entity_id: &str) -> Self {
        ServiceError::NotFound(format!("Entity '{}' not found", entity_id))
    }
}

impl From<ServiceError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ErrorResponse::with_status(status, err.to_string())
    }
}
