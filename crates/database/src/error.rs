//! Storage error types.

use thiserror::Error;

/// Errors surfaced by the persistence layer.
///
/// Write failures are propagated as-is; the engine does not retry storage
/// operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Underlying SQLx failure (connection, query, decode).
    #[error("storage error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No row for the given identifier.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Insert collided with an existing row.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
