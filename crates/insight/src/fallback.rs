//! Keyword fallback for failed LLM analyses.
//!
//! When the provider is unreachable, times out, or answers with something
//! that is not the expected JSON, the analyzer degrades to this heuristic
//! instead of failing: broad regex sets scanned over the customer's own
//! messages (agent turns are ignored). The result is tagged so downstream
//! consumers can tell heuristic from AI-derived assessments.

use contact_core::{ConversationMessage, Direction, InterestLevel};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::InterestAnalysis;

/// Provenance note on every fallback result.
pub const FALLBACK_REASON: &str = "Keyword-based analysis (AI analysis failed)";

static POSITIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(price|pricing|cost|how much|quote|buy|purchase|order|book|booking|schedule|appointment|demo|available|interested|yes|sure|sounds good|sign me up|tell me more)\b",
    )
    .expect("positive fallback pattern is valid")
});

static NEGATIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(stop|unsubscribe|not interested|no thanks|no thank you|wrong number|spam|leave me alone|go away|remove me|don't|do not)\b",
    )
    .expect("negative fallback pattern is valid")
});

/// Produce a degraded-confidence analysis from the customer's messages.
pub fn fallback_analysis(messages: &[ConversationMessage]) -> InterestAnalysis {
    let mut positive_signals: Vec<String> = Vec::new();
    let mut negative_signals: Vec<String> = Vec::new();

    for msg in messages.iter().filter(|m| m.direction == Direction::Inbound) {
        for hit in POSITIVE_PATTERN.find_iter(&msg.content) {
            let hit = hit.as_str().to_lowercase();
            if !positive_signals.contains(&hit) {
                positive_signals.push(hit);
            }
        }
        for hit in NEGATIVE_PATTERN.find_iter(&msg.content) {
            let hit = hit.as_str().to_lowercase();
            if !negative_signals.contains(&hit) {
                negative_signals.push(hit);
            }
        }
    }

    let (interest_level, interest_score) =
        score(positive_signals.len(), negative_signals.len());

    InterestAnalysis {
        interest_level,
        interest_score,
        interest_reason: FALLBACK_REASON.to_string(),
        key_topics: Vec::new(),
        objections: Vec::new(),
        positive_signals,
        negative_signals,
    }
}

/// Map signal counts to a level and score.
///
/// Any negative signal dominates, mirroring the keyword classifier's
/// precedence rule (opt-out phrases like "not interested" also trip the
/// positive pattern on their "interested" substring, so counting ties would
/// misread opt-outs as enthusiasm).
fn score(positive: usize, negative: usize) -> (InterestLevel, i64) {
    if negative > 0 {
        (InterestLevel::NotInterested, 25)
    } else if positive >= 3 {
        (InterestLevel::HighlyInterested, 85)
    } else if positive > 0 {
        (InterestLevel::Interested, 70)
    } else {
        (InterestLevel::Neutral, 50)
    }
}
