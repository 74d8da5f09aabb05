//! Error types for endo

use thiserror::Error;

/// Result type alias for endo operations
pub type EndoResult<T> = Result<T, EndoError>;

/// Errors reported by the runtime query builder
#[derive(Debug, Error)]
pub enum EndoError {
    /// The builder was used in a way that breaks the placeholder/argument contract
    #[error("Validation error: {0}")]
    Validation(String),
}

impl EndoError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
