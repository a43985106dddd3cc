//! Configuration validation

use thiserror::Error;

/// Validation failure for a configuration section
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trait for validating configuration sections after deserialization
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}
