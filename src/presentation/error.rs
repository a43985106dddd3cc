//! HTTP error mapping
//!
//! Each failure kind maps to one stable response classification so clients
//! can branch deterministically: NotFound -> 404, Validation -> 422,
//! PermissionDenied -> 403, Conflict -> 409, auth failures -> 401.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use uuid::Uuid;

use crate::application::errors::ApplicationError;
use crate::domain::auth::errors::AuthError;
use crate::domain::errors::DomainError;

use super::models::ErrorResponse;

/// Error rendered as a JSON `ErrorResponse` with a stable machine code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        let message = error.to_string();
        match error {
            DomainError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
            }
            DomainError::Validation { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
            }
            DomainError::PermissionDenied => {
                Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
            }
            DomainError::Conflict { .. } => Self::new(StatusCode::CONFLICT, "CONFLICT", message),
            DomainError::Database { .. } => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", message)
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let message = error.to_string();
        match error {
            AuthError::InvalidCredentials => {
                Self::new(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", message)
            }
            AuthError::InvalidToken => {
                Self::new(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", message)
            }
            AuthError::TokenExpired => {
                Self::new(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", message)
            }
            AuthError::InactiveUser => {
                Self::new(StatusCode::UNAUTHORIZED, "INACTIVE_USER", message)
            }
            AuthError::UsernameAlreadyExists { .. } | AuthError::EmailAlreadyExists { .. } => {
                Self::new(StatusCode::CONFLICT, "CONFLICT", message)
            }
            AuthError::WeakPassword | AuthError::InvalidPassword { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
            }
            AuthError::UserNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
            }
            AuthError::DatabaseError { .. } => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", message)
            }
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Domain(e) => e.into(),
            ApplicationError::Authentication(e) => e.into(),
            ApplicationError::Configuration { message } => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR", message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            code: self.code.to_string(),
            message: self.message,
            details: None,
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };
        (self.status, Json(body)).into_response()
    }
}
