//! Unified Error Handling
//!
//! Provides the application-level error type and the API response envelope.
//!
//! # Error codes
//!
//! | Code | Status | Meaning |
//! |------|--------|---------|
//! | VALIDATION_ERROR | 400 | Malformed input |
//! | NOT_FOUND | 404 | Referenced entity does not exist |
//! | CONFLICT | 409 | Lost the race / already cancelled |
//! | NO_CAPACITY | 422 | No candidate satisfies the request |
//! | OUTSIDE_SERVICE_WINDOW | 422 | Requested window misses every configured one |
//! | DATABASE_ERROR | 500 | Storage failure |
//! | INTERNAL_ERROR | 500 | Anything else |

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::domain::DomainError;

/// Unified API response structure
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No capacity: {0}")]
    NoCapacity(String),

    #[error("Requested time is outside the service window")]
    OutsideServiceWindow,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        AppError::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NoCapacity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "NO_CAPACITY", msg.clone())
            }
            AppError::OutsideServiceWindow => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "OUTSIDE_SERVICE_WINDOW",
                self.to_string(),
            ),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound { entity, id } => {
                AppError::NotFound(format!("{entity} {id} not found"))
            }
            DomainError::NoCapacity(msg) => AppError::NoCapacity(msg),
            DomainError::OutsideServiceWindow => AppError::OutsideServiceWindow,
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Repository(msg) => AppError::Database(msg),
        }
    }
}
