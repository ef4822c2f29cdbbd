//! Qualification statistics and the source/campaign/agent report.

use contact_core::{LeadSource, QualificationCategory};
use database::{qualification, Database, QualificationReportRow, Result};
use serde::Serialize;

/// Category counts with whole-number percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct QualificationStats {
    pub total: i64,
    pub interested: i64,
    pub not_interested: i64,
    pub pending: i64,
    pub interested_percent: i64,
    pub not_interested_percent: i64,
    pub pending_percent: i64,
}

impl QualificationStats {
    fn from_counts(interested: i64, not_interested: i64, pending: i64) -> Self {
        let total = interested + not_interested + pending;
        Self {
            total,
            interested,
            not_interested,
            pending,
            interested_percent: percent(interested, total),
            not_interested_percent: percent(not_interested, total),
            pending_percent: percent(pending, total),
        }
    }
}

/// Percentage rounded to a whole number; 0 when the total is 0.
fn percent(count: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as i64
}

/// Stats for one group in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    /// Group key (source name, campaign id, or agent id).
    pub key: String,
    /// Display name, taken from the first record seen in the group.
    pub name: String,
    #[serde(flatten)]
    pub stats: QualificationStats,
}

/// The full qualification report.
#[derive(Debug, Clone, Serialize)]
pub struct QualificationReport {
    pub by_source: Vec<GroupReport>,
    pub by_campaign: Vec<GroupReport>,
    pub by_agent: Vec<GroupReport>,
    pub overall: QualificationStats,
}

/// Running category tally for one group.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    interested: i64,
    not_interested: i64,
    pending: i64,
}

impl Tally {
    fn add(&mut self, category: QualificationCategory) {
        match category {
            QualificationCategory::Interested => self.interested += 1,
            QualificationCategory::NotInterested => self.not_interested += 1,
            QualificationCategory::Pending => self.pending += 1,
        }
    }

    fn stats(&self) -> QualificationStats {
        QualificationStats::from_counts(self.interested, self.not_interested, self.pending)
    }
}

/// Overall category counts and percentages.
pub async fn qualification_stats(db: &Database) -> Result<QualificationStats> {
    let mut interested = 0;
    let mut not_interested = 0;
    let mut pending = 0;

    for (category, count) in qualification::count_by_category(db.pool()).await? {
        match category {
            QualificationCategory::Interested => interested = count,
            QualificationCategory::NotInterested => not_interested = count,
            QualificationCategory::Pending => pending = count,
        }
    }

    Ok(QualificationStats::from_counts(
        interested,
        not_interested,
        pending,
    ))
}

/// Three independent group-bys (source, campaign, agent) plus the overall
/// stats.
///
/// Sources always cover the full enum, zero-count groups included. Campaign
/// and agent groups appear in first-record order with display names from
/// that first record.
pub async fn qualification_report(db: &Database) -> Result<QualificationReport> {
    let rows = qualification::report_rows(db.pool()).await?;

    // Fixed source groups, zero-seeded.
    let mut source_tallies = [Tally::default(); 5];
    // Campaign/agent groups in first-seen order: (key, display name, tally).
    let mut campaigns: Vec<(String, String, Tally)> = Vec::new();
    let mut agents: Vec<(String, String, Tally)> = Vec::new();
    let mut overall = Tally::default();

    for row in &rows {
        overall.add(row.category);

        let source_idx = LeadSource::ALL
            .iter()
            .position(|s| *s == row.source)
            .unwrap_or(0);
        source_tallies[source_idx].add(row.category);

        if let Some(campaign_id) = &row.campaign_id {
            let display = row
                .campaign_name
                .clone()
                .unwrap_or_else(|| campaign_id.clone());
            tally_group(&mut campaigns, campaign_id, &display, row.category);
        }

        if let Some(agent_id) = &row.agent_id {
            let display = row.agent_name.clone().unwrap_or_else(|| agent_id.clone());
            tally_group(&mut agents, agent_id, &display, row.category);
        }
    }

    let by_source = LeadSource::ALL
        .iter()
        .zip(source_tallies.iter())
        .map(|(source, tally)| GroupReport {
            key: source.as_str().to_string(),
            name: source.display_name().to_string(),
            stats: tally.stats(),
        })
        .collect();

    Ok(QualificationReport {
        by_source,
        by_campaign: into_reports(campaigns),
        by_agent: into_reports(agents),
        overall: overall.stats(),
    })
}

/// Add one record to its group, creating the group on first sight.
/// The display name sticks from the first record.
fn tally_group(
    groups: &mut Vec<(String, String, Tally)>,
    key: &str,
    display: &str,
    category: QualificationCategory,
) {
    match groups.iter_mut().find(|(k, _, _)| k == key) {
        Some((_, _, tally)) => tally.add(category),
        None => {
            let mut tally = Tally::default();
            tally.add(category);
            groups.push((key.to_string(), display.to_string(), tally));
        }
    }
}

fn into_reports(groups: Vec<(String, String, Tally)>) -> Vec<GroupReport> {
    groups
        .into_iter()
        .map(|(key, name, tally)| GroupReport {
            key,
            name,
            stats: tally.stats(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contact_core::LeadSource;
    use database::Qualification;
    use sqlx::types::Json;
    use uuid::Uuid;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed(
        db: &Database,
        source: LeadSource,
        category: QualificationCategory,
        campaign: Option<(&str, &str)>,
        agent: Option<(&str, &str)>,
    ) {
        let now = Utc::now();
        let phone = format!("1415555{:04}", rand_suffix());
        let record = Qualification {
            id: Uuid::new_v4().to_string(),
            contact_id: phone.clone(),
            phone,
            name: "Contact".to_string(),
            source,
            campaign_id: campaign.map(|(id, _)| id.to_string()),
            campaign_name: campaign.map(|(_, name)| name.to_string()),
            agent_id: agent.map(|(id, _)| id.to_string()),
            agent_name: agent.map(|(_, name)| name.to_string()),
            category,
            score: 50,
            total_messages: 1,
            keywords: Json(Vec::new()),
            first_contact_at: now,
            last_message_at: now,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        qualification::insert(db.pool(), &record).await.unwrap();
    }

    fn rand_suffix() -> u16 {
        use std::sync::atomic::{AtomicU16, Ordering};
        static NEXT: AtomicU16 = AtomicU16::new(0);
        NEXT.fetch_add(1, Ordering::Relaxed)
    }

    #[tokio::test]
    async fn test_stats_empty_dataset_is_all_zeros() {
        let db = test_db().await;

        let stats = qualification_stats(&db).await.unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.interested, 0);
        assert_eq!(stats.interested_percent, 0);
        assert_eq!(stats.not_interested_percent, 0);
        assert_eq!(stats.pending_percent, 0);
    }

    #[tokio::test]
    async fn test_stats_percentages_round() {
        let db = test_db().await;
        seed(&db, LeadSource::Ad, QualificationCategory::Interested, None, None).await;
        seed(&db, LeadSource::Ad, QualificationCategory::Interested, None, None).await;
        seed(&db, LeadSource::Ad, QualificationCategory::Pending, None, None).await;

        let stats = qualification_stats(&db).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.interested, 2);
        assert_eq!(stats.interested_percent, 67); // 66.67 rounds up
        assert_eq!(stats.pending_percent, 33);
    }

    #[tokio::test]
    async fn test_report_sources_cover_full_enum() {
        let db = test_db().await;
        seed(&db, LeadSource::Campaign, QualificationCategory::Interested, None, None).await;

        let report = qualification_report(&db).await.unwrap();
        assert_eq!(report.by_source.len(), 5);

        let campaign = report
            .by_source
            .iter()
            .find(|g| g.key == "campaign")
            .unwrap();
        assert_eq!(campaign.stats.total, 1);

        // Zero-count sources are still present.
        let manual = report.by_source.iter().find(|g| g.key == "manual").unwrap();
        assert_eq!(manual.stats.total, 0);
        assert_eq!(manual.stats.interested_percent, 0);
    }

    #[tokio::test]
    async fn test_report_group_names_come_from_first_record() {
        let db = test_db().await;
        seed(
            &db,
            LeadSource::Campaign,
            QualificationCategory::Interested,
            Some(("camp-1", "Spring Sale")),
            None,
        )
        .await;
        // Later record renamed the campaign; the report keeps the first name.
        seed(
            &db,
            LeadSource::Campaign,
            QualificationCategory::Pending,
            Some(("camp-1", "Spring Sale v2")),
            None,
        )
        .await;

        let report = qualification_report(&db).await.unwrap();
        assert_eq!(report.by_campaign.len(), 1);
        assert_eq!(report.by_campaign[0].name, "Spring Sale");
        assert_eq!(report.by_campaign[0].stats.total, 2);
    }

    #[tokio::test]
    async fn test_report_by_agent_and_overall() {
        let db = test_db().await;
        seed(
            &db,
            LeadSource::AiChat,
            QualificationCategory::Interested,
            None,
            Some(("agent-1", "Concierge")),
        )
        .await;
        seed(
            &db,
            LeadSource::AiChat,
            QualificationCategory::NotInterested,
            None,
            Some(("agent-2", "Closer")),
        )
        .await;
        seed(&db, LeadSource::Manual, QualificationCategory::Pending, None, None).await;

        let report = qualification_report(&db).await.unwrap();
        assert_eq!(report.by_agent.len(), 2);
        assert_eq!(report.overall.total, 3);
        assert_eq!(report.overall.interested, 1);
        assert_eq!(report.overall.not_interested, 1);
        assert_eq!(report.overall.pending, 1);

        // Records without an agent don't form a group.
        let agent_total: i64 = report.by_agent.iter().map(|g| g.stats.total).sum();
        assert_eq!(agent_total, 2);
    }
}
