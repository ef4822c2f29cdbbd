//! Qualifier error types.

use thiserror::Error;

/// Errors that can occur during qualification operations.
#[derive(Debug, Error)]
pub enum QualifierError {
    /// Invalid caller input, rejected before any storage access.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage failure.
    #[error(transparent)]
    Database(#[from] database::DatabaseError),
}

/// Result type for qualification operations.
pub type Result<T> = std::result::Result<T, QualifierError>;
