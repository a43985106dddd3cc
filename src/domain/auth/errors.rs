//! Authentication domain errors

use thiserror::Error;

/// Authentication-specific domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid credentials provided")]
    InvalidCredentials,

    #[error("Invalid token provided")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("User account is inactive")]
    InactiveUser,

    #[error("Username already exists: {username}")]
    UsernameAlreadyExists { username: String },

    #[error("Email already exists: {email}")]
    EmailAlreadyExists { email: String },

    #[error("Invalid password: {reason}")]
    InvalidPassword { reason: String },

    #[error("Password is too weak - must be at least 8 characters")]
    WeakPassword,

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Database error: {message}")]
    DatabaseError { message: String },
}
