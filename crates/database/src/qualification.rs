//! Qualification CRUD and aggregate queries.

use contact_core::{LeadSource, PhoneQuery, QualificationCategory};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Qualification, QualificationReportRow};

const COLUMNS: &str = "id, contact_id, phone, name, source, campaign_id, campaign_name, \
                       agent_id, agent_name, category, score, total_messages, keywords, \
                       first_contact_at, last_message_at, notes, created_at, updated_at";

/// Insert a new qualification.
pub async fn insert(pool: &SqlitePool, qualification: &Qualification) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO qualifications
            (id, contact_id, phone, name, source, campaign_id, campaign_name,
             agent_id, agent_name, category, score, total_messages, keywords,
             first_contact_at, last_message_at, notes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&qualification.id)
    .bind(&qualification.contact_id)
    .bind(&qualification.phone)
    .bind(&qualification.name)
    .bind(qualification.source)
    .bind(&qualification.campaign_id)
    .bind(&qualification.campaign_name)
    .bind(&qualification.agent_id)
    .bind(&qualification.agent_name)
    .bind(qualification.category)
    .bind(qualification.score)
    .bind(qualification.total_messages)
    .bind(&qualification.keywords)
    .bind(qualification.first_contact_at)
    .bind(qualification.last_message_at)
    .bind(&qualification.notes)
    .bind(qualification.created_at)
    .bind(qualification.updated_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Qualification",
                    id: qualification.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Replace an existing qualification row.
pub async fn update(pool: &SqlitePool, qualification: &Qualification) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE qualifications
        SET contact_id = ?, phone = ?, name = ?, source = ?, campaign_id = ?,
            campaign_name = ?, agent_id = ?, agent_name = ?, category = ?,
            score = ?, total_messages = ?, keywords = ?, first_contact_at = ?,
            last_message_at = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&qualification.contact_id)
    .bind(&qualification.phone)
    .bind(&qualification.name)
    .bind(qualification.source)
    .bind(&qualification.campaign_id)
    .bind(&qualification.campaign_name)
    .bind(&qualification.agent_id)
    .bind(&qualification.agent_name)
    .bind(qualification.category)
    .bind(qualification.score)
    .bind(qualification.total_messages)
    .bind(&qualification.keywords)
    .bind(qualification.first_contact_at)
    .bind(qualification.last_message_at)
    .bind(&qualification.notes)
    .bind(qualification.updated_at)
    .bind(&qualification.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Qualification",
            id: qualification.id.clone(),
        });
    }

    Ok(())
}

/// Get a qualification by ID.
pub async fn get(pool: &SqlitePool, id: &str) -> Result<Qualification> {
    sqlx::query_as::<_, Qualification>(&format!(
        "SELECT {COLUMNS} FROM qualifications WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Qualification",
        id: id.to_string(),
    })
}

/// Find the qualification for a phone number, if any.
pub async fn find_by_phone(pool: &SqlitePool, query: &PhoneQuery) -> Result<Option<Qualification>> {
    let record = sqlx::query_as::<_, Qualification>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM qualifications
        WHERE phone = ?
           OR (? IS NOT NULL AND length(phone) >= 10 AND phone LIKE '%' || ?)
        ORDER BY updated_at DESC
        LIMIT 1
        "#
    ))
    .bind(&query.normalized)
    .bind(&query.suffix)
    .bind(&query.suffix)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// List qualifications, optionally filtered by source, newest first.
pub async fn list(
    pool: &SqlitePool,
    source: Option<LeadSource>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Qualification>> {
    let records = match source {
        Some(source) => {
            sqlx::query_as::<_, Qualification>(&format!(
                r#"
                SELECT {COLUMNS}
                FROM qualifications
                WHERE source = ?
                ORDER BY last_message_at DESC
                LIMIT ? OFFSET ?
                "#
            ))
            .bind(source)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Qualification>(&format!(
                r#"
                SELECT {COLUMNS}
                FROM qualifications
                ORDER BY last_message_at DESC
                LIMIT ? OFFSET ?
                "#
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(records)
}

/// Count qualifications, optionally filtered by source.
pub async fn count(pool: &SqlitePool, source: Option<LeadSource>) -> Result<i64> {
    let count = match source {
        Some(source) => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM qualifications WHERE source = ?")
                .bind(source)
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM qualifications")
                .fetch_one(pool)
                .await?
        }
    };

    Ok(count)
}

/// Count qualifications grouped by category.
pub async fn count_by_category(
    pool: &SqlitePool,
) -> Result<Vec<(QualificationCategory, i64)>> {
    let rows = sqlx::query_as::<_, (QualificationCategory, i64)>(
        r#"
        SELECT category, COUNT(*) as count
        FROM qualifications
        GROUP BY category
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch the lightweight projection used by report group-bys.
///
/// Ordered by creation so group display names come from the first record
/// in each group.
pub async fn report_rows(pool: &SqlitePool) -> Result<Vec<QualificationReportRow>> {
    let rows = sqlx::query_as::<_, QualificationReportRow>(
        r#"
        SELECT source, campaign_id, campaign_name, agent_id, agent_name, category
        FROM qualifications
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Overwrite the category (manual operator override).
///
/// Bypasses the merge state machine entirely. Notes are replaced only when
/// supplied.
pub async fn set_category(
    pool: &SqlitePool,
    id: &str,
    category: QualificationCategory,
    notes: Option<&str>,
) -> Result<()> {
    let result = match notes {
        Some(notes) => {
            sqlx::query(
                "UPDATE qualifications SET category = ?, notes = ?, updated_at = ? WHERE id = ?",
            )
            .bind(category)
            .bind(notes)
            .bind(chrono::Utc::now())
            .bind(id)
            .execute(pool)
            .await?
        }
        None => {
            sqlx::query("UPDATE qualifications SET category = ?, updated_at = ? WHERE id = ?")
                .bind(category)
                .bind(chrono::Utc::now())
                .bind(id)
                .execute(pool)
                .await?
        }
    };

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Qualification",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Overwrite the operator notes.
pub async fn set_notes(pool: &SqlitePool, id: &str, notes: &str) -> Result<()> {
    let result = sqlx::query("UPDATE qualifications SET notes = ?, updated_at = ? WHERE id = ?")
        .bind(notes)
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Qualification",
            id: id.to_string(),
        });
    }

    Ok(())
}
