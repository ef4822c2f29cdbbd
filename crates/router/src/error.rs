//! Router error types.

use thiserror::Error;

/// Errors that can occur during routing operations.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Invalid caller input, rejected before any storage access.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage failure.
    #[error(transparent)]
    Database(#[from] database::DatabaseError),
}

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RouterError>;
