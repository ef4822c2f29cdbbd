//! Contact analytics summary.

use contact_core::InterestLevel;
use database::{analytics, Database, Result};
use serde::Serialize;

/// Count of records at one interest level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterestLevelCount {
    pub level: InterestLevel,
    pub count: i64,
}

/// One entry in the top-agents ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopAgent {
    pub agent_id: String,
    pub agent_name: String,
    /// Number of contacts this agent has interacted with.
    pub contacts: i64,
    /// Total messages across those contacts.
    pub messages: i64,
}

/// The analytics summary.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total: i64,
    /// Counts for every interest level, zero-count levels included.
    pub by_interest_level: Vec<InterestLevelCount>,
    /// Average interest score across all records; 0 when there are none.
    pub average_score: f64,
    /// Up to five agents ranked by contacts interacted with.
    pub top_agents: Vec<TopAgent>,
}

/// Maximum number of agents in the ranking.
const TOP_AGENTS: usize = 5;

/// Summarize all contact analytics records.
pub async fn analytics_summary(db: &Database) -> Result<AnalyticsSummary> {
    let total = analytics::count(db.pool(), None).await?;

    let counts = analytics::count_by_interest_level(db.pool()).await?;
    let by_interest_level = InterestLevel::ALL
        .iter()
        .map(|level| InterestLevelCount {
            level: *level,
            count: counts
                .iter()
                .find(|(l, _)| l == level)
                .map(|(_, n)| *n)
                .unwrap_or(0),
        })
        .collect();

    let average_score = analytics::average_interest_score(db.pool())
        .await?
        .unwrap_or(0.0);

    let top_agents = rank_agents(analytics::all_agent_interactions(db.pool()).await?);

    Ok(AnalyticsSummary {
        total,
        by_interest_level,
        average_score,
        top_agents,
    })
}

/// Flatten per-record interaction lists into a per-agent ranking.
///
/// Each record an agent appears in counts as one contact; ties break on
/// total messages.
fn rank_agents(per_record: Vec<Vec<database::AgentInteraction>>) -> Vec<TopAgent> {
    let mut agents: Vec<TopAgent> = Vec::new();

    for interactions in per_record {
        for interaction in interactions {
            match agents
                .iter_mut()
                .find(|agent| agent.agent_id == interaction.agent_id)
            {
                Some(agent) => {
                    agent.contacts += 1;
                    agent.messages += interaction.messages_count;
                    if agent.agent_name.is_empty() {
                        agent.agent_name = interaction.agent_name;
                    }
                }
                None => agents.push(TopAgent {
                    agent_id: interaction.agent_id,
                    agent_name: interaction.agent_name,
                    contacts: 1,
                    messages: interaction.messages_count,
                }),
            }
        }
    }

    agents.sort_by(|a, b| {
        b.contacts
            .cmp(&a.contacts)
            .then(b.messages.cmp(&a.messages))
    });
    agents.truncate(TOP_AGENTS);
    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use database::{AgentInteraction, ContactAnalytics};
    use sqlx::types::Json;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn interaction(agent_id: &str, agent_name: &str, messages: i64) -> AgentInteraction {
        let now = Utc::now();
        AgentInteraction {
            agent_id: agent_id.to_string(),
            agent_name: agent_name.to_string(),
            messages_count: messages,
            first_interaction: now,
            last_interaction: now,
            duration_minutes: 0,
        }
    }

    async fn seed(
        db: &Database,
        phone: &str,
        level: InterestLevel,
        score: i64,
        interactions: Vec<AgentInteraction>,
    ) {
        let mut record = ContactAnalytics::new(phone, phone, "Contact");
        record.interest_level = level;
        record.interest_score = score;
        record.ai_agent_interactions = Json(interactions);
        analytics::insert(db.pool(), &record).await.unwrap();
    }

    #[tokio::test]
    async fn test_summary_empty_dataset() {
        let db = test_db().await;

        let summary = analytics_summary(&db).await.unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.top_agents.is_empty());
        // All five levels present at zero.
        assert_eq!(summary.by_interest_level.len(), 5);
        assert!(summary.by_interest_level.iter().all(|c| c.count == 0));
    }

    #[tokio::test]
    async fn test_summary_counts_and_average() {
        let db = test_db().await;
        seed(&db, "14155550001", InterestLevel::Interested, 80, vec![]).await;
        seed(&db, "14155550002", InterestLevel::Interested, 60, vec![]).await;
        seed(&db, "14155550003", InterestLevel::NotInterested, 10, vec![]).await;

        let summary = analytics_summary(&db).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.average_score, 50.0);

        let interested = summary
            .by_interest_level
            .iter()
            .find(|c| c.level == InterestLevel::Interested)
            .unwrap();
        assert_eq!(interested.count, 2);

        let highly = summary
            .by_interest_level
            .iter()
            .find(|c| c.level == InterestLevel::HighlyInterested)
            .unwrap();
        assert_eq!(highly.count, 0);
    }

    #[tokio::test]
    async fn test_top_agents_ranked_by_contacts() {
        let db = test_db().await;
        // agent-1 appears on two contacts, agent-2 on one (but with more messages).
        seed(
            &db,
            "14155550001",
            InterestLevel::Neutral,
            50,
            vec![interaction("agent-1", "Concierge", 2)],
        )
        .await;
        seed(
            &db,
            "14155550002",
            InterestLevel::Neutral,
            50,
            vec![
                interaction("agent-1", "Concierge", 3),
                interaction("agent-2", "Closer", 40),
            ],
        )
        .await;

        let summary = analytics_summary(&db).await.unwrap();
        assert_eq!(summary.top_agents.len(), 2);
        assert_eq!(summary.top_agents[0].agent_id, "agent-1");
        assert_eq!(summary.top_agents[0].contacts, 2);
        assert_eq!(summary.top_agents[0].messages, 5);
        assert_eq!(summary.top_agents[1].agent_id, "agent-2");
    }

    #[tokio::test]
    async fn test_top_agents_truncates_to_five() {
        let db = test_db().await;
        for i in 0..7 {
            seed(
                &db,
                &format!("141555500{:02}", i),
                InterestLevel::Neutral,
                50,
                vec![interaction(&format!("agent-{i}"), "Agent", 1)],
            )
            .await;
        }

        let summary = analytics_summary(&db).await.unwrap();
        assert_eq!(summary.top_agents.len(), 5);
    }
}
