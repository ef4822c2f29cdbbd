//! LLM-based contact interest analysis with keyword fallback.
//!
//! The richer half of the interest assessment: the full conversation
//! transcript goes to a chat-completion provider which returns a strict
//! JSON assessment (level, score, topics, objections, signals). On any
//! failure (network, timeout, provider error, unparseable output) the
//! analyzer degrades to a regex heuristic over the customer's messages and
//! tags the result as heuristic-derived, so callers never see a hard
//! failure from the AI provider.
//!
//! # Example
//!
//! ```no_run
//! use insight::InterestAnalyzer;
//!
//! # async fn example() -> insight::Result<()> {
//! let analyzer = InterestAnalyzer::from_env()?;
//! let analysis = analyzer.analyze_conversation("14155550100", &[]).await;
//! println!("{}: {}", analysis.interest_level.as_str(), analysis.interest_score);
//! # Ok(())
//! # }
//! ```

mod analysis;
mod api_types;
mod config;
mod error;
mod fallback;
mod provider;
mod service;

pub use analysis::{build_transcript, parse_analysis, InterestAnalysis, SYSTEM_PROMPT};
pub use api_types::ChatMessage;
pub use config::{InsightConfig, InsightConfigBuilder};
pub use error::{InsightError, Result};
pub use fallback::{fallback_analysis, FALLBACK_REASON};
pub use provider::{ChatCompletionProvider, HttpProvider};
pub use service::{track_agent_interaction, InterestAnalyzer};
