//! Intake error types.

use thiserror::Error;

/// Errors that can occur while processing a message event.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Invalid event, rejected before any storage access.
    #[error("validation error: {0}")]
    Validation(String),

    /// Routing failure.
    #[error(transparent)]
    Router(#[from] router::RouterError),

    /// Qualification failure.
    #[error(transparent)]
    Qualifier(#[from] qualifier::QualifierError),

    /// Analysis failure (storage side; provider failures are recovered
    /// inside the analyzer).
    #[error(transparent)]
    Insight(#[from] insight::InsightError),

    /// Storage failure.
    #[error(transparent)]
    Database(#[from] database::DatabaseError),
}

/// Result type for intake operations.
pub type Result<T> = std::result::Result<T, IntakeError>;
