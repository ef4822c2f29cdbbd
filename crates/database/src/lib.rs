//! SQLite persistence layer for Trellis.
//!
//! This crate provides async database operations for agent assignments,
//! qualifications, and contact analytics using SQLx with SQLite. Nested
//! documents (conversation history, keyword sets, agent interactions) are
//! stored as JSON TEXT columns.
//!
//! All phone lookups go through [`contact_core::PhoneQuery`] so that exact
//! and last-10-digit suffix matches share one set of semantics.
//!
//! # Example
//!
//! ```no_run
//! use database::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:trellis.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod assignment;
pub mod error;
pub mod models;
pub mod qualification;

pub use error::{DatabaseError, Result};
pub use models::{
    AgentAssignment, AgentInteraction, ContactAnalytics, Qualification, QualificationReportRow,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// High enough to handle concurrent message processing across contacts.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(url, pool_size, "Connected to database");

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// Call once after connecting; brings the schema up to date.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contact_core::{PhoneQuery, QualificationCategory};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_assignment_crud() {
        let db = test_db().await;

        // Create
        let record = AgentAssignment::new("contact-1", "14155550100", "agent-1", None);
        assignment::insert(db.pool(), &record).await.unwrap();

        // Read (exact phone)
        let fetched = assignment::find_active_by_phone(db.pool(), &PhoneQuery::new("14155550100"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.agent_id, "agent-1");
        assert!(fetched.is_active);

        // Update
        let mut updated = fetched.clone();
        updated.agent_id = "agent-2".to_string();
        updated.updated_at = Utc::now();
        assignment::update(db.pool(), &updated).await.unwrap();

        let fetched = assignment::find_active_by_phone(db.pool(), &PhoneQuery::new("14155550100"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.agent_id, "agent-2");

        // Deactivate
        let deactivated =
            assignment::deactivate_by_phone(db.pool(), &PhoneQuery::new("14155550100"))
                .await
                .unwrap();
        assert!(deactivated);
        let gone = assignment::find_active_by_phone(db.pool(), &PhoneQuery::new("14155550100"))
            .await
            .unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test]
    async fn test_qualification_not_found() {
        let db = test_db().await;
        let result = qualification::get(db.pool(), "missing-id").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = qualification::set_category(
            db.pool(),
            "missing-id",
            QualificationCategory::Interested,
            None,
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
