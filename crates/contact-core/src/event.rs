//! Message events and classification enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a conversational message relative to the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Sent by the contact.
    Inbound,
    /// Sent by an agent on our side.
    Outbound,
}

/// Channel/origin of a contact's first engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum LeadSource {
    AiChat,
    Campaign,
    Ad,
    LeadForm,
    Manual,
}

impl LeadSource {
    /// All sources, in reporting order.
    pub const ALL: [LeadSource; 5] = [
        LeadSource::AiChat,
        LeadSource::Campaign,
        LeadSource::Ad,
        LeadSource::LeadForm,
        LeadSource::Manual,
    ];

    /// Wire/storage name for this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::AiChat => "ai_chat",
            LeadSource::Campaign => "campaign",
            LeadSource::Ad => "ad",
            LeadSource::LeadForm => "lead_form",
            LeadSource::Manual => "manual",
        }
    }

    /// Human-readable display name for reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            LeadSource::AiChat => "AI Chat",
            LeadSource::Campaign => "Campaign",
            LeadSource::Ad => "Ad",
            LeadSource::LeadForm => "Lead Form",
            LeadSource::Manual => "Manual",
        }
    }
}

/// Keyword-derived interest category of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum QualificationCategory {
    Interested,
    NotInterested,
    Pending,
}

impl QualificationCategory {
    /// Wire/storage name for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualificationCategory::Interested => "interested",
            QualificationCategory::NotInterested => "not_interested",
            QualificationCategory::Pending => "pending",
        }
    }
}

/// LLM-derived interest level of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum InterestLevel {
    HighlyInterested,
    Interested,
    Neutral,
    NotInterested,
    Pending,
}

impl InterestLevel {
    /// All levels, in reporting order.
    pub const ALL: [InterestLevel; 5] = [
        InterestLevel::HighlyInterested,
        InterestLevel::Interested,
        InterestLevel::Neutral,
        InterestLevel::NotInterested,
        InterestLevel::Pending,
    ];

    /// Wire/storage name for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestLevel::HighlyInterested => "highly_interested",
            InterestLevel::Interested => "interested",
            InterestLevel::Neutral => "neutral",
            InterestLevel::NotInterested => "not_interested",
            InterestLevel::Pending => "pending",
        }
    }
}

/// Role of a conversation history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRole {
    /// The contact.
    User,
    /// The agent.
    Assistant,
}

impl HistoryRole {
    /// Wire name, matching chat-completion role strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRole::User => "user",
            HistoryRole::Assistant => "assistant",
        }
    }
}

impl From<Direction> for HistoryRole {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Inbound => HistoryRole::User,
            Direction::Outbound => HistoryRole::Assistant,
        }
    }
}

/// A single entry in an assignment's bounded conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn now(role: HistoryRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A timestamp-free projection of a history entry, suitable for feeding
/// directly into a chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: HistoryRole,
    pub content: String,
}

impl From<HistoryEntry> for ChatTurn {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            role: entry.role,
            content: entry.content,
        }
    }
}

/// A message with direction and timing, as the interest analyzer sees a
/// conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub direction: Direction,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    /// A message sent by the contact.
    pub fn inbound(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            direction: Direction::Inbound,
            content: content.into(),
            timestamp,
        }
    }

    /// A message sent by an agent.
    pub fn outbound(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            direction: Direction::Outbound,
            content: content.into(),
            timestamp,
        }
    }
}

impl From<HistoryEntry> for ConversationMessage {
    fn from(entry: HistoryEntry) -> Self {
        let direction = match entry.role {
            HistoryRole::User => Direction::Inbound,
            HistoryRole::Assistant => Direction::Outbound,
        };
        Self {
            direction,
            content: entry.content,
            timestamp: entry.timestamp,
        }
    }
}

/// One message event as delivered by the ingestion collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Caller-side contact identifier.
    pub contact_id: String,
    /// Raw phone number as received (normalized on entry).
    pub phone: String,
    /// Contact display name.
    pub name: String,
    /// Message body.
    pub content: String,
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
    pub source: LeadSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}
