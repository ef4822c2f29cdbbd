//! Qualification record maintenance.

use chrono::Utc;
use contact_core::{LeadSource, PhoneQuery, QualificationCategory};
use database::{qualification, Database, Qualification};
use sqlx::types::Json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{QualifierError, Result};
use crate::keywords::analyze_message;
use crate::merge::merge_assessment;

/// Optional identifying fields accompanying a contact message.
///
/// Each field overwrites the stored value only when supplied; absent fields
/// leave the record untouched.
#[derive(Debug, Clone, Default)]
pub struct QualificationUpdate {
    pub contact_id: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
}

/// Run the keyword classifier over one contact message and fold the result
/// into the contact's qualification record, creating it on first contact.
///
/// Keywords accumulate as a union and never shrink; the category follows the
/// monotonic state machine in [`crate::merge`]; `total_messages` increments
/// on every call.
pub async fn create_or_update_qualification(
    db: &Database,
    phone: &str,
    name: &str,
    message: &str,
    source: LeadSource,
    update: &QualificationUpdate,
) -> Result<Qualification> {
    let query = PhoneQuery::new(phone);
    if query.is_empty() {
        return Err(QualifierError::Validation(format!(
            "phone number contains no digits: {phone:?}"
        )));
    }

    let analysis = analyze_message(message);
    debug!(
        phone = %query.normalized,
        category = analysis.category.as_str(),
        score = analysis.score,
        "Classified message"
    );

    let now = Utc::now();

    let Some(mut record) = qualification::find_by_phone(db.pool(), &query).await? else {
        let record = Qualification {
            id: Uuid::new_v4().to_string(),
            contact_id: update
                .contact_id
                .clone()
                .unwrap_or_else(|| query.normalized.clone()),
            phone: query.normalized.clone(),
            name: name.to_string(),
            source,
            campaign_id: update.campaign_id.clone(),
            campaign_name: update.campaign_name.clone(),
            agent_id: update.agent_id.clone(),
            agent_name: update.agent_name.clone(),
            category: analysis.category,
            score: analysis.score,
            total_messages: 1,
            keywords: Json(analysis.keywords),
            first_contact_at: now,
            last_message_at: now,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        qualification::insert(db.pool(), &record).await?;
        info!(phone = %record.phone, source = source.as_str(), "Created qualification");
        return Ok(record);
    };

    // Keyword union: append-only, no duplicates.
    for keyword in &analysis.keywords {
        if !record.keywords.0.contains(keyword) {
            record.keywords.0.push(keyword.clone());
        }
    }

    let (category, score) = merge_assessment(record.category, record.score, &analysis);
    record.category = category;
    record.score = score;
    record.total_messages += 1;
    record.last_message_at = now;
    record.updated_at = now;

    if !name.is_empty() {
        record.name = name.to_string();
    }
    if let Some(contact_id) = &update.contact_id {
        record.contact_id = contact_id.clone();
    }
    if let Some(campaign_id) = &update.campaign_id {
        record.campaign_id = Some(campaign_id.clone());
    }
    if let Some(campaign_name) = &update.campaign_name {
        record.campaign_name = Some(campaign_name.clone());
    }
    if let Some(agent_id) = &update.agent_id {
        record.agent_id = Some(agent_id.clone());
    }
    if let Some(agent_name) = &update.agent_name {
        record.agent_name = Some(agent_name.clone());
    }

    qualification::update(db.pool(), &record).await?;

    Ok(record)
}

/// Manually override the category, bypassing the automatic state machine.
///
/// Exists so a human operator can correct any misclassification (including
/// resetting to `pending`). Notes are replaced only when supplied.
pub async fn update_qualification_category(
    db: &Database,
    id: &str,
    category: QualificationCategory,
    notes: Option<&str>,
) -> Result<Qualification> {
    qualification::set_category(db.pool(), id, category, notes).await?;
    info!(id, category = category.as_str(), "Manual category override");

    Ok(qualification::get(db.pool(), id).await?)
}

/// Manually replace the operator notes.
pub async fn update_qualification_notes(
    db: &Database,
    id: &str,
    notes: &str,
) -> Result<Qualification> {
    qualification::set_notes(db.pool(), id, notes).await?;

    Ok(qualification::get(db.pool(), id).await?)
}
