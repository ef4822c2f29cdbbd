//! Contact analytics CRUD and aggregate queries.

use contact_core::{InterestLevel, PhoneQuery};
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{AgentInteraction, ContactAnalytics};

const COLUMNS: &str = "id, contact_id, phone, contact_name, interest_level, interest_score, \
                       interest_reason, total_messages, inbound_messages, outbound_messages, \
                       ai_agent_interactions, first_contact_time, last_contact_time, \
                       conversation_duration, key_topics, objections, positive_signals, \
                       negative_signals, last_analyzed_at, created_at, updated_at";

/// Insert a new analytics record.
pub async fn insert(pool: &SqlitePool, record: &ContactAnalytics) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO contact_analytics
            (id, contact_id, phone, contact_name, interest_level, interest_score,
             interest_reason, total_messages, inbound_messages, outbound_messages,
             ai_agent_interactions, first_contact_time, last_contact_time,
             conversation_duration, key_topics, objections, positive_signals,
             negative_signals, last_analyzed_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.contact_id)
    .bind(&record.phone)
    .bind(&record.contact_name)
    .bind(record.interest_level)
    .bind(record.interest_score)
    .bind(&record.interest_reason)
    .bind(record.total_messages)
    .bind(record.inbound_messages)
    .bind(record.outbound_messages)
    .bind(&record.ai_agent_interactions)
    .bind(record.first_contact_time)
    .bind(record.last_contact_time)
    .bind(record.conversation_duration)
    .bind(&record.key_topics)
    .bind(&record.objections)
    .bind(&record.positive_signals)
    .bind(&record.negative_signals)
    .bind(record.last_analyzed_at)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "ContactAnalytics",
                    id: record.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Replace an existing analytics row (whole-record update).
pub async fn update(pool: &SqlitePool, record: &ContactAnalytics) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE contact_analytics
        SET contact_id = ?, phone = ?, contact_name = ?, interest_level = ?,
            interest_score = ?, interest_reason = ?, total_messages = ?,
            inbound_messages = ?, outbound_messages = ?, ai_agent_interactions = ?,
            first_contact_time = ?, last_contact_time = ?, conversation_duration = ?,
            key_topics = ?, objections = ?, positive_signals = ?,
            negative_signals = ?, last_analyzed_at = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&record.contact_id)
    .bind(&record.phone)
    .bind(&record.contact_name)
    .bind(record.interest_level)
    .bind(record.interest_score)
    .bind(&record.interest_reason)
    .bind(record.total_messages)
    .bind(record.inbound_messages)
    .bind(record.outbound_messages)
    .bind(&record.ai_agent_interactions)
    .bind(record.first_contact_time)
    .bind(record.last_contact_time)
    .bind(record.conversation_duration)
    .bind(&record.key_topics)
    .bind(&record.objections)
    .bind(&record.positive_signals)
    .bind(&record.negative_signals)
    .bind(record.last_analyzed_at)
    .bind(record.updated_at)
    .bind(&record.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "ContactAnalytics",
            id: record.id.clone(),
        });
    }

    Ok(())
}

/// Find the analytics record for a phone number, if any.
pub async fn find_by_phone(
    pool: &SqlitePool,
    query: &PhoneQuery,
) -> Result<Option<ContactAnalytics>> {
    let record = sqlx::query_as::<_, ContactAnalytics>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM contact_analytics
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

/// List analytics records, optionally filtered by interest level, newest first.
pub async fn list(
    pool: &SqlitePool,
    interest_level: Option<InterestLevel>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ContactAnalytics>> {
    let records = match interest_level {
        Some(level) => {
            sqlx::query_as::<_, ContactAnalytics>(&format!(
                r#"
                SELECT {COLUMNS}
                FROM contact_analytics
                WHERE interest_level = ?
                ORDER BY updated_at DESC
                LIMIT ? OFFSET ?
                "#
            ))
            .bind(level)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ContactAnalytics>(&format!(
                r#"
                SELECT {COLUMNS}
                FROM contact_analytics
                ORDER BY updated_at DESC
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

/// Count analytics records, optionally filtered by interest level.
pub async fn count(pool: &SqlitePool, interest_level: Option<InterestLevel>) -> Result<i64> {
    let count = match interest_level {
        Some(level) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM contact_analytics WHERE interest_level = ?",
            )
            .bind(level)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_analytics")
                .fetch_one(pool)
                .await?
        }
    };

    Ok(count)
}

/// Count analytics records grouped by interest level.
pub async fn count_by_interest_level(pool: &SqlitePool) -> Result<Vec<(InterestLevel, i64)>> {
    let rows = sqlx::query_as::<_, (InterestLevel, i64)>(
        r#"
        SELECT interest_level, COUNT(*) as count
        FROM contact_analytics
        GROUP BY interest_level
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Average interest score across all records, if any exist.
pub async fn average_interest_score(pool: &SqlitePool) -> Result<Option<f64>> {
    let avg = sqlx::query_scalar::<_, Option<f64>>(
        "SELECT AVG(interest_score) FROM contact_analytics",
    )
    .fetch_one(pool)
    .await?;

    Ok(avg)
}

/// Fetch every record's agent interaction list, for the top-agents ranking.
pub async fn all_agent_interactions(pool: &SqlitePool) -> Result<Vec<Vec<AgentInteraction>>> {
    let rows = sqlx::query_scalar::<_, Json<Vec<AgentInteraction>>>(
        "SELECT ai_agent_interactions FROM contact_analytics",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|json| json.0).collect())
}
