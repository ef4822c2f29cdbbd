//! Analyzer orchestration over the contact analytics store.

use std::sync::Arc;

use chrono::Utc;
use contact_core::{ConversationMessage, Direction, PhoneQuery};
use database::{analytics, AgentInteraction, ContactAnalytics, Database};
use sqlx::types::Json;
use tracing::{debug, info, warn};

use crate::analysis::{
    build_transcript, hash_prompt, parse_analysis, InterestAnalysis, SYSTEM_PROMPT,
};
use crate::api_types::ChatMessage;
use crate::error::{InsightError, Result};
use crate::fallback::fallback_analysis;
use crate::provider::{ChatCompletionProvider, HttpProvider};

/// The LLM interest analyzer.
///
/// Wraps a [`ChatCompletionProvider`] and degrades to the keyword fallback
/// on any provider failure, so analysis operations never hard-fail because
/// of the AI provider.
pub struct InterestAnalyzer {
    provider: Arc<dyn ChatCompletionProvider>,
    prompt_hash: String,
}

impl InterestAnalyzer {
    /// Create an analyzer over the given provider.
    pub fn new(provider: Arc<dyn ChatCompletionProvider>) -> Self {
        let prompt_hash = hash_prompt(SYSTEM_PROMPT);
        info!("Interest analyzer prompt fingerprint: {}", prompt_hash);

        Self {
            provider,
            prompt_hash,
        }
    }

    /// Create an analyzer with an HTTP provider configured from environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Arc::new(HttpProvider::from_env()?)))
    }

    /// Get the system prompt fingerprint.
    pub fn prompt_hash(&self) -> &str {
        &self.prompt_hash
    }

    /// Analyze a conversation and return the interest assessment.
    ///
    /// Never fails: any provider or parse error falls through to
    /// [`fallback_analysis`], whose result carries a heuristic provenance
    /// note in `interest_reason`.
    pub async fn analyze_conversation(
        &self,
        phone: &str,
        messages: &[ConversationMessage],
    ) -> InterestAnalysis {
        let transcript = build_transcript(messages);
        let request = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(transcript),
        ];

        match self.provider.complete(request).await {
            Ok(response) => match parse_analysis(&response) {
                Ok(analysis) => {
                    debug!(
                        phone,
                        level = analysis.interest_level.as_str(),
                        score = analysis.interest_score,
                        "Conversation analysis complete"
                    );
                    analysis
                }
                Err(e) => {
                    warn!(phone, error = %e, "Analysis response unusable; using keyword fallback");
                    fallback_analysis(messages)
                }
            },
            Err(e) => {
                warn!(phone, error = %e, "Analysis call failed; using keyword fallback");
                fallback_analysis(messages)
            }
        }
    }

    /// Analyze a conversation and persist the result into the contact's
    /// analytics record, creating the record on first analysis.
    ///
    /// Message counters and conversation duration are recomputed from the
    /// message list; the write is a whole-record replace.
    pub async fn analyze_and_update_contact(
        &self,
        db: &Database,
        contact_id: &str,
        phone: &str,
        contact_name: &str,
        messages: &[ConversationMessage],
    ) -> Result<ContactAnalytics> {
        let query = phone_query(phone)?;

        let analysis = self.analyze_conversation(&query.normalized, messages).await;

        let mut record = get_or_create(db, &query, contact_id, contact_name).await?;

        record.contact_id = contact_id.to_string();
        if !contact_name.is_empty() {
            record.contact_name = contact_name.to_string();
        }

        record.interest_level = analysis.interest_level;
        record.interest_score = analysis.interest_score;
        record.interest_reason = analysis.interest_reason.clone();
        record.key_topics = Json(analysis.key_topics.clone());
        record.objections = Json(analysis.objections.clone());
        record.positive_signals = Json(analysis.positive_signals.clone());
        record.negative_signals = Json(analysis.negative_signals.clone());

        record.total_messages = messages.len() as i64;
        record.inbound_messages = messages
            .iter()
            .filter(|m| m.direction == Direction::Inbound)
            .count() as i64;
        record.outbound_messages = record.total_messages - record.inbound_messages;

        let first = messages.iter().map(|m| m.timestamp).min();
        let last = messages.iter().map(|m| m.timestamp).max();
        record.first_contact_time = first;
        record.last_contact_time = last;
        record.conversation_duration = match (first, last) {
            (Some(first), Some(last)) => (last - first).num_minutes(),
            _ => 0,
        };

        let now = Utc::now();
        record.last_analyzed_at = Some(now);
        record.updated_at = now;

        analytics::update(db.pool(), &record).await?;

        info!(
            phone = %record.phone,
            level = record.interest_level.as_str(),
            score = record.interest_score,
            "Updated contact analytics"
        );

        Ok(record)
    }
}

/// Record one agent turn against the contact's analytics record.
///
/// Finds or creates the per-agent entry in `ai_agent_interactions`,
/// increments its message count, and recomputes its duration from the first
/// interaction. The analytics record itself is created if missing.
pub async fn track_agent_interaction(
    db: &Database,
    phone: &str,
    agent_id: &str,
    agent_name: &str,
) -> Result<ContactAnalytics> {
    let query = phone_query(phone)?;

    let mut record = get_or_create(db, &query, &query.normalized, "").await?;
    let now = Utc::now();

    match record
        .ai_agent_interactions
        .0
        .iter_mut()
        .find(|entry| entry.agent_id == agent_id)
    {
        Some(entry) => {
            entry.messages_count += 1;
            entry.last_interaction = now;
            entry.duration_minutes = (now - entry.first_interaction).num_minutes();
            if !agent_name.is_empty() {
                entry.agent_name = agent_name.to_string();
            }
        }
        None => {
            record.ai_agent_interactions.0.push(AgentInteraction {
                agent_id: agent_id.to_string(),
                agent_name: agent_name.to_string(),
                messages_count: 1,
                first_interaction: now,
                last_interaction: now,
                duration_minutes: 0,
            });
        }
    }

    record.updated_at = now;
    analytics::update(db.pool(), &record).await?;

    Ok(record)
}

/// Get the analytics record for a phone, inserting a fresh one if missing.
async fn get_or_create(
    db: &Database,
    query: &PhoneQuery,
    contact_id: &str,
    contact_name: &str,
) -> Result<ContactAnalytics> {
    if let Some(record) = analytics::find_by_phone(db.pool(), query).await? {
        return Ok(record);
    }

    let record = ContactAnalytics::new(contact_id, query.normalized.clone(), contact_name);
    analytics::insert(db.pool(), &record).await?;
    debug!(phone = %record.phone, "Created contact analytics record");

    Ok(record)
}

/// Validate and resolve a raw phone number before any storage access.
fn phone_query(phone: &str) -> Result<PhoneQuery> {
    let query = PhoneQuery::new(phone);
    if query.is_empty() {
        return Err(InsightError::Validation(format!(
            "phone number contains no digits: {phone:?}"
        )));
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use contact_core::InterestLevel;
    use crate::fallback::FALLBACK_REASON;

    /// Provider returning a canned response or a canned failure.
    struct MockProvider {
        response: std::result::Result<String, String>,
    }

    impl MockProvider {
        fn ok(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(response.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err("connection refused".to_string()),
            })
        }
    }

    #[async_trait]
    impl ChatCompletionProvider for MockProvider {
        async fn complete(&self, _messages: Vec<ChatMessage>) -> Result<String> {
            self.response
                .clone()
                .map_err(InsightError::Network)
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn conversation() -> Vec<ConversationMessage> {
        let start = Utc::now() - Duration::minutes(30);
        vec![
            ConversationMessage::inbound("How much does it cost?", start),
            ConversationMessage::outbound("It's $49/month.", start + Duration::minutes(5)),
            ConversationMessage::inbound("Can I book a demo?", start + Duration::minutes(30)),
        ]
    }

    #[tokio::test]
    async fn test_analyze_conversation_parses_model_output() {
        let provider = MockProvider::ok(
            r#"```json
{"interest_level": "highly_interested", "interest_score": 90, "interest_reason": "asked to book", "key_topics": ["pricing", "demo"]}
```"#,
        );
        let analyzer = InterestAnalyzer::new(provider);

        let analysis = analyzer
            .analyze_conversation("14155550100", &conversation())
            .await;

        assert_eq!(analysis.interest_level, InterestLevel::HighlyInterested);
        assert_eq!(analysis.interest_score, 90);
        assert_eq!(analysis.key_topics, vec!["pricing", "demo"]);
    }

    #[tokio::test]
    async fn test_analyze_conversation_falls_back_on_provider_failure() {
        let analyzer = InterestAnalyzer::new(MockProvider::failing());

        let analysis = analyzer
            .analyze_conversation("14155550100", &conversation())
            .await;

        // Derived purely from the customer's messages, tagged as heuristic.
        assert_eq!(analysis.interest_reason, FALLBACK_REASON);
        assert_ne!(analysis.interest_level, InterestLevel::Pending);
        assert!(!analysis.positive_signals.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_conversation_falls_back_on_garbage_response() {
        let analyzer =
            InterestAnalyzer::new(MockProvider::ok("I think they are quite interested!"));

        let analysis = analyzer
            .analyze_conversation("14155550100", &conversation())
            .await;

        assert_eq!(analysis.interest_reason, FALLBACK_REASON);
    }

    #[tokio::test]
    async fn test_analyze_and_update_contact_recomputes_counters() {
        let db = test_db().await;
        let provider = MockProvider::ok(r#"{"interest_level": "interested", "interest_score": 70}"#);
        let analyzer = InterestAnalyzer::new(provider);

        let record = analyzer
            .analyze_and_update_contact(&db, "c-1", "+1 415 555 0100", "Dana", &conversation())
            .await
            .unwrap();

        assert_eq!(record.phone, "14155550100");
        assert_eq!(record.total_messages, 3);
        assert_eq!(record.inbound_messages, 2);
        assert_eq!(record.outbound_messages, 1);
        assert_eq!(record.conversation_duration, 30);
        assert_eq!(record.interest_level, InterestLevel::Interested);
        assert!(record.last_analyzed_at.is_some());

        // Second run replaces the record rather than creating another one.
        let again = analyzer
            .analyze_and_update_contact(&db, "c-1", "14155550100", "Dana", &conversation())
            .await
            .unwrap();
        assert_eq!(again.id, record.id);
        assert_eq!(analytics::count(db.pool(), None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_analyze_and_update_rejects_empty_phone() {
        let db = test_db().await;
        let analyzer = InterestAnalyzer::new(MockProvider::failing());

        let result = analyzer
            .analyze_and_update_contact(&db, "c-1", "n/a", "Dana", &[])
            .await;
        assert!(matches!(result, Err(InsightError::Validation(_))));
    }

    #[tokio::test]
    async fn test_track_agent_interaction_finds_or_creates() {
        let db = test_db().await;

        let record = track_agent_interaction(&db, "14155550100", "agent-1", "Concierge")
            .await
            .unwrap();
        assert_eq!(record.ai_agent_interactions.0.len(), 1);
        assert_eq!(record.ai_agent_interactions.0[0].messages_count, 1);

        let record = track_agent_interaction(&db, "14155550100", "agent-1", "Concierge")
            .await
            .unwrap();
        assert_eq!(record.ai_agent_interactions.0.len(), 1);
        assert_eq!(record.ai_agent_interactions.0[0].messages_count, 2);

        // A different agent gets its own entry.
        let record = track_agent_interaction(&db, "14155550100", "agent-2", "Closer")
            .await
            .unwrap();
        assert_eq!(record.ai_agent_interactions.0.len(), 2);
    }
}
