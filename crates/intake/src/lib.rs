//! Per-message intake orchestration.
//!
//! The ingestion collaborator delivers one [`MessageEvent`] per message
//! (at-least-once); [`Intake::process`] drives the write side per event:
//!
//! 1. validate the phone number (empty input never reaches storage);
//! 2. apply the agent assignment when the event names an agent, and append
//!    the message to the assignment's bounded history;
//! 3. run the keyword classifier synchronously for inbound messages;
//! 4. record agent interactions and, per policy, run a full conversation
//!    analysis through the configured [`InterestAnalyzer`].
//!
//! Events for different contacts (and even for the same contact) may be
//! processed concurrently; storage updates are read-modify-write without
//! optimistic locking, so concurrent same-contact updates can lose writes.
//! Acceptable for a best-effort engagement score.

mod error;

pub use error::{IntakeError, Result};

use contact_core::{
    ConversationMessage, Direction, HistoryRole, MessageEvent, PhoneQuery,
};
use database::{ContactAnalytics, Database, Qualification};
use insight::InterestAnalyzer;
use qualifier::QualificationUpdate;
use tracing::{debug, info};

/// Intake policy knobs.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Run a full conversation analysis every N inbound messages.
    pub analyze_after_messages: u32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            analyze_after_messages: 5,
        }
    }
}

impl IntakeConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `INTAKE_ANALYZE_AFTER_MESSAGES` - Analysis cadence (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let analyze_after_messages = std::env::var("INTAKE_ANALYZE_AFTER_MESSAGES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.analyze_after_messages);

        Self {
            analyze_after_messages,
        }
    }
}

/// What one processed event changed.
#[derive(Debug)]
pub struct IntakeOutcome {
    /// The qualification record after this event, for inbound messages.
    pub qualification: Option<Qualification>,
    /// Whether the message landed in an assignment's history.
    pub history_recorded: bool,
    /// The analytics record, when this event triggered a full analysis.
    pub analytics: Option<ContactAnalytics>,
}

/// The per-message write-side driver.
pub struct Intake {
    db: Database,
    analyzer: Option<InterestAnalyzer>,
    config: IntakeConfig,
}

impl Intake {
    /// Create an intake over the given database, without an analyzer.
    /// Qualifications and routing still run; analytics stay untouched.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            analyzer: None,
            config: IntakeConfig::default(),
        }
    }

    /// Attach an interest analyzer.
    pub fn with_analyzer(mut self, analyzer: InterestAnalyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Replace the policy configuration.
    pub fn with_config(mut self, config: IntakeConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Process one message event.
    pub async fn process(&self, event: &MessageEvent) -> Result<IntakeOutcome> {
        let query = PhoneQuery::new(&event.phone);
        if query.is_empty() {
            return Err(IntakeError::Validation(format!(
                "phone number contains no digits: {:?}",
                event.phone
            )));
        }

        debug!(
            phone = %query.normalized,
            direction = ?event.direction,
            source = event.source.as_str(),
            "Processing message event"
        );

        // Routing: events that name an agent (re)assign the conversation.
        if let Some(agent_id) = &event.agent_id {
            router::assign(
                &self.db,
                &event.contact_id,
                &event.phone,
                agent_id,
                event.agent_name.as_deref(),
            )
            .await?;
        }

        let history_recorded = router::add_message_to_history(
            &self.db,
            &event.phone,
            HistoryRole::from(event.direction),
            &event.content,
        )
        .await?;

        // Fast lane: keyword qualification for customer messages.
        let qualification = match event.direction {
            Direction::Inbound => Some(
                qualifier::create_or_update_qualification(
                    &self.db,
                    &event.phone,
                    &event.name,
                    &event.content,
                    event.source,
                    &QualificationUpdate {
                        contact_id: Some(event.contact_id.clone()),
                        campaign_id: event.campaign_id.clone(),
                        campaign_name: event.campaign_name.clone(),
                        agent_id: event.agent_id.clone(),
                        agent_name: event.agent_name.clone(),
                    },
                )
                .await?,
            ),
            Direction::Outbound => None,
        };

        // Analytics bookkeeping: agent turns count toward per-agent
        // interaction summaries.
        if event.direction == Direction::Outbound {
            if let Some(agent_id) = &event.agent_id {
                insight::track_agent_interaction(
                    &self.db,
                    &event.phone,
                    agent_id,
                    event.agent_name.as_deref().unwrap_or(""),
                )
                .await?;
            }
        }

        let analytics = self.maybe_analyze(event, qualification.as_ref()).await?;

        Ok(IntakeOutcome {
            qualification,
            history_recorded,
            analytics,
        })
    }

    /// Run a full conversation analysis when the cadence policy says so.
    async fn maybe_analyze(
        &self,
        event: &MessageEvent,
        qualification: Option<&Qualification>,
    ) -> Result<Option<ContactAnalytics>> {
        let Some(analyzer) = &self.analyzer else {
            return Ok(None);
        };
        let Some(qualification) = qualification else {
            return Ok(None);
        };

        let cadence = self.config.analyze_after_messages.max(1) as i64;
        if qualification.total_messages % cadence != 0 {
            return Ok(None);
        }

        let messages = self.conversation_for(event).await?;
        let record = analyzer
            .analyze_and_update_contact(
                &self.db,
                &event.contact_id,
                &event.phone,
                &event.name,
                &messages,
            )
            .await?;

        info!(
            phone = %record.phone,
            after_messages = qualification.total_messages,
            "Ran scheduled conversation analysis"
        );

        Ok(Some(record))
    }

    /// The conversation as the analyzer should see it: the assignment's
    /// history when one exists, otherwise just the triggering event.
    async fn conversation_for(&self, event: &MessageEvent) -> Result<Vec<ConversationMessage>> {
        let assignment = router::agent_for_contact(&self.db, &event.phone).await?;

        let messages = match assignment {
            Some(assignment) if !assignment.conversation_history.0.is_empty() => assignment
                .conversation_history
                .0
                .into_iter()
                .map(ConversationMessage::from)
                .collect(),
            _ => vec![ConversationMessage {
                direction: event.direction,
                content: event.content.clone(),
                timestamp: event.timestamp,
            }],
        };

        Ok(messages)
    }
}
