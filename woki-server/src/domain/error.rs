//! Domain Error Types
//!
//! Every outcome the allocation engine can produce short of success. All of
//! these are expected, typed results surfaced to the caller unchanged; only
//! `Repository` wraps an infrastructure failure.

use thiserror::Error;

/// Engine-level error taxonomy
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("No capacity: {0}")]
    NoCapacity(String),

    #[error("Requested time is outside the service window")]
    OutsideServiceWindow,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

/// Result type for domain and allocation operations
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn no_capacity(msg: impl Into<String>) -> Self {
        DomainError::NoCapacity(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }

    pub fn repository(msg: impl Into<String>) -> Self {
        DomainError::Repository(msg.into())
    }
}
