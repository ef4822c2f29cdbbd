//! Agent assignment CRUD operations.
//!
//! Phone lookups match on the normalized form or, when both sides carry at
//! least 10 digits, on the last-10-digit suffix (country-code variance).

use contact_core::PhoneQuery;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::AgentAssignment;

/// Insert a new assignment.
pub async fn insert(pool: &SqlitePool, assignment: &AgentAssignment) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO agent_assignments
            (id, contact_id, phone, agent_id, agent_name, conversation_history,
             is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&assignment.id)
    .bind(&assignment.contact_id)
    .bind(&assignment.phone)
    .bind(&assignment.agent_id)
    .bind(&assignment.agent_name)
    .bind(&assignment.conversation_history)
    .bind(assignment.is_active)
    .bind(assignment.created_at)
    .bind(assignment.updated_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "AgentAssignment",
                    id: assignment.phone.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Replace an existing assignment row.
pub async fn update(pool: &SqlitePool, assignment: &AgentAssignment) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE agent_assignments
        SET contact_id = ?, phone = ?, agent_id = ?, agent_name = ?,
            conversation_history = ?, is_active = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&assignment.contact_id)
    .bind(&assignment.phone)
    .bind(&assignment.agent_id)
    .bind(&assignment.agent_name)
    .bind(&assignment.conversation_history)
    .bind(assignment.is_active)
    .bind(assignment.updated_at)
    .bind(&assignment.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "AgentAssignment",
            id: assignment.id.clone(),
        });
    }

    Ok(())
}

/// Find the active assignment for a phone number, if any.
pub async fn find_active_by_phone(
    pool: &SqlitePool,
    query: &PhoneQuery,
) -> Result<Option<AgentAssignment>> {
    let record = sqlx::query_as::<_, AgentAssignment>(
        r#"
        SELECT id, contact_id, phone, agent_id, agent_name, conversation_history,
               is_active, created_at, updated_at
        FROM agent_assignments
        WHERE is_active = 1
          AND (phone = ?
               OR (? IS NOT NULL AND length(phone) >= 10 AND phone LIKE '%' || ?))
        ORDER BY updated_at DESC
        LIMIT 1
        "#,
    )
    .bind(&query.normalized)
    .bind(&query.suffix)
    .bind(&query.suffix)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Find the most recent assignment for a phone number regardless of active
/// state. Used when re-assigning a previously deactivated contact.
pub async fn find_by_phone(
    pool: &SqlitePool,
    query: &PhoneQuery,
) -> Result<Option<AgentAssignment>> {
    let record = sqlx::query_as::<_, AgentAssignment>(
        r#"
        SELECT id, contact_id, phone, agent_id, agent_name, conversation_history,
               is_active, created_at, updated_at
        FROM agent_assignments
        WHERE phone = ?
           OR (? IS NOT NULL AND length(phone) >= 10 AND phone LIKE '%' || ?)
        ORDER BY is_active DESC, updated_at DESC
        LIMIT 1
        "#,
    )
    .bind(&query.normalized)
    .bind(&query.suffix)
    .bind(&query.suffix)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Soft-deactivate the active assignment for a phone number.
///
/// History is retained. Returns true if an active assignment was found.
pub async fn deactivate_by_phone(pool: &SqlitePool, query: &PhoneQuery) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE agent_assignments
        SET is_active = 0, updated_at = ?
        WHERE is_active = 1
          AND (phone = ?
               OR (? IS NOT NULL AND length(phone) >= 10 AND phone LIKE '%' || ?))
        "#,
    )
    .bind(chrono::Utc::now())
    .bind(&query.normalized)
    .bind(&query.suffix)
    .bind(&query.suffix)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_suffix_match_across_country_codes() {
        let db = test_db().await;

        let record = AgentAssignment::new("c-1", "14155550100", "agent-1", None);
        insert(db.pool(), &record).await.unwrap();

        // Same contact without the country code.
        let found = find_active_by_phone(db.pool(), &PhoneQuery::new("4155550100"))
            .await
            .unwrap();
        assert!(found.is_some());

        // Different tail does not match.
        let other = find_active_by_phone(db.pool(), &PhoneQuery::new("4155550199"))
            .await
            .unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_short_phone_requires_exact_match() {
        let db = test_db().await;

        let record = AgentAssignment::new("c-1", "5550100", "agent-1", None);
        insert(db.pool(), &record).await.unwrap();

        let found = find_active_by_phone(db.pool(), &PhoneQuery::new("5550100"))
            .await
            .unwrap();
        assert!(found.is_some());

        // No suffix rule below 10 digits.
        let miss = find_active_by_phone(db.pool(), &PhoneQuery::new("15550100"))
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_deactivate_preserves_history() {
        let db = test_db().await;

        let mut record = AgentAssignment::new("c-1", "14155550100", "agent-1", None);
        record
            .conversation_history
            .0
            .push(contact_core::HistoryEntry::now(
                contact_core::HistoryRole::User,
                "hello",
            ));
        insert(db.pool(), &record).await.unwrap();

        let deactivated = deactivate_by_phone(db.pool(), &PhoneQuery::new("14155550100"))
            .await
            .unwrap();
        assert!(deactivated);

        // Row still exists with its history, just inactive.
        let row = sqlx::query_as::<_, AgentAssignment>(
            "SELECT id, contact_id, phone, agent_id, agent_name, conversation_history, is_active, created_at, updated_at FROM agent_assignments WHERE id = ?",
        )
        .bind(&record.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert!(!row.is_active);
        assert_eq!(row.conversation_history.0.len(), 1);

        // Deactivating again is a no-op.
        let again = deactivate_by_phone(db.pool(), &PhoneQuery::new("14155550100"))
            .await
            .unwrap();
        assert!(!again);
    }
}
