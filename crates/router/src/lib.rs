//! Sticky agent-to-contact session routing.
//!
//! Each contact (keyed by normalized phone number) has at most one active
//! [`AgentAssignment`] carrying a bounded rolling transcript. Assigning is
//! an upsert: a contact already owned by one agent can be handed to another
//! (a new campaign taking over the conversation is a normal operation).
//! Removal is a soft deactivation; history is retained for audit.
//!
//! All operations are free functions over an explicit [`Database`] handle.

mod error;

pub use error::{Result, RouterError};

use chrono::Utc;
use contact_core::{ChatTurn, HistoryEntry, HistoryRole, PhoneQuery};
use database::{assignment, AgentAssignment, Database};
use tracing::{debug, info};

/// Maximum number of history entries retained per assignment.
/// Oldest entries are evicted first.
pub const HISTORY_LIMIT: usize = 20;

/// Assign an agent to a contact, creating or updating the assignment.
///
/// When an assignment already matches the phone (active or previously
/// deactivated), the agent is swapped in place and the assignment is
/// reactivated; the conversation history carries over. Otherwise a new
/// assignment is created.
pub async fn assign(
    db: &Database,
    contact_id: &str,
    phone: &str,
    agent_id: &str,
    agent_name: Option<&str>,
) -> Result<AgentAssignment> {
    let query = phone_query(phone)?;

    if let Some(mut existing) = assignment::find_by_phone(db.pool(), &query).await? {
        debug!(
            phone = %existing.phone,
            from_agent = %existing.agent_id,
            to_agent = %agent_id,
            "Updating agent assignment"
        );

        existing.contact_id = contact_id.to_string();
        existing.agent_id = agent_id.to_string();
        existing.agent_name = agent_name.map(str::to_string);
        existing.is_active = true;
        existing.updated_at = Utc::now();
        assignment::update(db.pool(), &existing).await?;

        return Ok(existing);
    }

    let record = AgentAssignment::new(
        contact_id,
        query.normalized.clone(),
        agent_id,
        agent_name.map(str::to_string),
    );
    assignment::insert(db.pool(), &record).await?;

    info!(phone = %record.phone, agent = %agent_id, "Created agent assignment");
    Ok(record)
}

/// Get the active assignment for a contact, or None if there is none (or the
/// contact was deactivated).
pub async fn agent_for_contact(db: &Database, phone: &str) -> Result<Option<AgentAssignment>> {
    let query = phone_query(phone)?;
    Ok(assignment::find_active_by_phone(db.pool(), &query).await?)
}

/// Append a message to the assignment's rolling history.
///
/// Retains only the most recent [`HISTORY_LIMIT`] entries. Returns `false`
/// when no active assignment exists; the caller must `assign` first (the
/// assignment is a precondition, not silently auto-created).
pub async fn add_message_to_history(
    db: &Database,
    phone: &str,
    role: HistoryRole,
    content: &str,
) -> Result<bool> {
    let query = phone_query(phone)?;

    let Some(mut record) = assignment::find_active_by_phone(db.pool(), &query).await? else {
        debug!(phone = %query.normalized, "No active assignment; dropping history append");
        return Ok(false);
    };

    let history = &mut record.conversation_history.0;
    history.push(HistoryEntry::now(role, content));
    if history.len() > HISTORY_LIMIT {
        let excess = history.len() - HISTORY_LIMIT;
        history.drain(0..excess);
    }

    record.updated_at = Utc::now();
    assignment::update(db.pool(), &record).await?;

    Ok(true)
}

/// Get the conversation history for a contact without timestamps, suitable
/// for feeding directly into a chat-completion call.
///
/// Returns an empty list when the contact has no active assignment.
pub async fn conversation_history(db: &Database, phone: &str) -> Result<Vec<ChatTurn>> {
    let query = phone_query(phone)?;

    let turns = assignment::find_active_by_phone(db.pool(), &query)
        .await?
        .map(|record| {
            record
                .conversation_history
                .0
                .into_iter()
                .map(ChatTurn::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(turns)
}

/// Soft-deactivate the contact's assignment. History is preserved.
///
/// Returns `false` when no active assignment exists.
pub async fn remove_agent_from_contact(db: &Database, phone: &str) -> Result<bool> {
    let query = phone_query(phone)?;

    let removed = assignment::deactivate_by_phone(db.pool(), &query).await?;
    if removed {
        info!(phone = %query.normalized, "Deactivated agent assignment");
    }

    Ok(removed)
}

/// Validate and resolve a raw phone number before any storage access.
fn phone_query(phone: &str) -> Result<PhoneQuery> {
    let query = PhoneQuery::new(phone);
    if query.is_empty() {
        return Err(RouterError::Validation(format!(
            "phone number contains no digits: {phone:?}"
        )));
    }
    Ok(query)
}
