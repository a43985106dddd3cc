//! Application-level error type

use thiserror::Error;

use crate::domain::auth::errors::AuthError;
use crate::domain::errors::DomainError;

/// Errors surfaced by application services to the presentation layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}
