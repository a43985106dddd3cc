//! Domain error taxonomy shared by all project-scoped operations
//!
//! Each variant maps to exactly one caller-visible response classification,
//! so clients can branch deterministically on the failure kind.

use thiserror::Error;

/// Errors surfaced by repositories and the report assembler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Access denied to this project")]
    PermissionDenied,

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    /// Shorthand for a NotFound error on a given entity kind
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
