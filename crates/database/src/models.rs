//! Database models.

use chrono::{DateTime, Utc};
use contact_core::{HistoryEntry, InterestLevel, LeadSource, QualificationCategory};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A sticky agent-to-contact routing decision.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgentAssignment {
    /// Row id (uuid v4).
    pub id: String,
    /// Caller-side contact identifier.
    pub contact_id: String,
    /// Normalized, digits-only phone number.
    pub phone: String,
    /// Owning agent.
    pub agent_id: String,
    /// Owning agent display name, if known.
    pub agent_name: Option<String>,
    /// Bounded rolling transcript; most recent 20 entries, oldest first.
    pub conversation_history: Json<Vec<HistoryEntry>>,
    /// Soft-deactivation flag; history is retained when false.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgentAssignment {
    /// Build a fresh active assignment with an empty history.
    ///
    /// `phone` must already be normalized.
    pub fn new(
        contact_id: impl Into<String>,
        phone: impl Into<String>,
        agent_id: impl Into<String>,
        agent_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            contact_id: contact_id.into(),
            phone: phone.into(),
            agent_id: agent_id.into(),
            agent_name,
            conversation_history: Json(Vec::new()),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A keyword-derived interest record, one per contact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Qualification {
    /// Row id (uuid v4).
    pub id: String,
    pub contact_id: String,
    /// Normalized, digits-only phone number.
    pub phone: String,
    /// Contact display name.
    pub name: String,
    pub source: LeadSource,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
    pub category: QualificationCategory,
    /// Interest score, 0-100.
    pub score: i64,
    /// Monotonic message counter.
    pub total_messages: i64,
    /// Matched keyword set; union across messages, never shrinks.
    pub keywords: Json<Vec<String>>,
    pub first_contact_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    /// Operator notes.
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lightweight qualification projection for report group-bys.
#[derive(Debug, Clone, FromRow)]
pub struct QualificationReportRow {
    pub source: LeadSource,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
    pub category: QualificationCategory,
}

/// Per-agent interaction summary inside a [`ContactAnalytics`] record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInteraction {
    pub agent_id: String,
    pub agent_name: String,
    pub messages_count: i64,
    pub first_interaction: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
    /// Minutes between first interaction and the latest turn.
    pub duration_minutes: i64,
}

/// An LLM-derived interest record, one per contact.
///
/// Maintained independently of [`Qualification`]; the two may disagree
/// (this one is semantically richer but only as fresh as the last analysis
/// run).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactAnalytics {
    /// Row id (uuid v4).
    pub id: String,
    pub contact_id: String,
    /// Normalized, digits-only phone number.
    pub phone: String,
    pub contact_name: String,
    pub interest_level: InterestLevel,
    /// Interest score, 0-100.
    pub interest_score: i64,
    /// Free-text rationale; notes heuristic provenance on fallback.
    pub interest_reason: String,
    pub total_messages: i64,
    pub inbound_messages: i64,
    pub outbound_messages: i64,
    pub ai_agent_interactions: Json<Vec<AgentInteraction>>,
    pub first_contact_time: Option<DateTime<Utc>>,
    pub last_contact_time: Option<DateTime<Utc>>,
    /// Minutes between the first and last message at analysis time.
    pub conversation_duration: i64,
    pub key_topics: Json<Vec<String>>,
    pub objections: Json<Vec<String>>,
    pub positive_signals: Json<Vec<String>>,
    pub negative_signals: Json<Vec<String>>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactAnalytics {
    /// Build a fresh, never-analyzed record.
    ///
    /// `phone` must already be normalized.
    pub fn new(
        contact_id: impl Into<String>,
        phone: impl Into<String>,
        contact_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            contact_id: contact_id.into(),
            phone: phone.into(),
            contact_name: contact_name.into(),
            interest_level: InterestLevel::Pending,
            interest_score: 50,
            interest_reason: String::new(),
            total_messages: 0,
            inbound_messages: 0,
            outbound_messages: 0,
            ai_agent_interactions: Json(Vec::new()),
            first_contact_time: None,
            last_contact_time: None,
            conversation_duration: 0,
            key_topics: Json(Vec::new()),
            objections: Json(Vec::new()),
            positive_signals: Json(Vec::new()),
            negative_signals: Json(Vec::new()),
            last_analyzed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
