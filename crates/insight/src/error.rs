//! Insight error types.

use thiserror::Error;

/// Errors that can occur during interest analysis.
///
/// `Network`, `Provider`, and `Parse` never escape the analyzer: they are
/// recovered locally via the keyword fallback and logged. `Validation` and
/// `Database` propagate to the caller.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure reaching the provider (includes timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with an error status.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider's response was not the expected JSON object.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid caller input, rejected before any storage access.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage failure.
    #[error(transparent)]
    Database(#[from] database::DatabaseError),
}

/// Result type for insight operations.
pub type Result<T> = std::result::Result<T, InsightError>;
