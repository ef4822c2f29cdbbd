//! Conversation analysis: prompt, transcript, and response parsing.

use contact_core::{ConversationMessage, Direction, InterestLevel};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::InsightError;

/// System instruction for the interest analysis call.
///
/// The model is asked for a strict JSON object; [`parse_analysis`] still
/// tolerates code fences and stray prose around the object.
pub const SYSTEM_PROMPT: &str = r#"You are a sales conversation analyst. Read the conversation between a customer and an agent and assess the customer's interest.

Output a single JSON object with exactly these fields:
- "interest_level": one of "highly_interested", "interested", "neutral", "not_interested"
- "interest_score": integer 0-100
- "interest_reason": short explanation of the assessment
- "key_topics": array of topics the customer raised
- "objections": array of concerns or objections the customer voiced
- "positive_signals": array of quotes or behaviors indicating interest
- "negative_signals": array of quotes or behaviors indicating disinterest

Guidelines:
- Judge by the customer's own words; the agent's enthusiasm is not a signal.
- Questions about price, scheduling, or availability are positive signals.
- Short or deflecting replies after several agent messages are negative signals.
- Use "highly_interested" only for explicit buying intent.

Respond with JSON only. No explanation."#;

/// Defaults applied for any field the model omits.
const DEFAULT_SCORE: i64 = 50;

fn default_level() -> InterestLevel {
    InterestLevel::Neutral
}

fn default_score() -> i64 {
    DEFAULT_SCORE
}

/// Result of one conversation analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestAnalysis {
    #[serde(default = "default_level")]
    pub interest_level: InterestLevel,
    #[serde(default = "default_score")]
    pub interest_score: i64,
    #[serde(default)]
    pub interest_reason: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub objections: Vec<String>,
    #[serde(default)]
    pub positive_signals: Vec<String>,
    #[serde(default)]
    pub negative_signals: Vec<String>,
}

/// Render the message list as a transcript for the model.
///
/// Inbound turns become `Customer:` lines, outbound turns `Agent:` lines.
pub fn build_transcript(messages: &[ConversationMessage]) -> String {
    messages
        .iter()
        .map(|msg| {
            let speaker = match msg.direction {
                Direction::Inbound => "Customer",
                Direction::Outbound => "Agent",
            };
            format!("{}: {}", speaker, msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse an analysis out of the model's response text.
///
/// Strips code fences and surrounding prose, then deserializes with
/// per-field defaults. The score is clamped to 0-100 regardless of what the
/// model produced.
pub fn parse_analysis(response: &str) -> Result<InterestAnalysis, InsightError> {
    let json_str = extract_json(response);

    let mut analysis = serde_json::from_str::<InterestAnalysis>(json_str).map_err(|e| {
        InsightError::Parse(format!("parse error: {}, response was: {}", e, response))
    })?;

    analysis.interest_score = analysis.interest_score.clamp(0, 100);

    Ok(analysis)
}

/// Short fingerprint of a prompt, for log correlation across deploys.
pub fn hash_prompt(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    hex_prefix(&digest, 8)
}

fn hex_prefix(bytes: &[u8], len: usize) -> String {
    bytes
        .iter()
        .take(len)
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Extract JSON from a response that may contain markdown or other text.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // If it starts with {, extract balanced JSON object
    if trimmed.starts_with('{') {
        return extract_balanced_json(trimmed);
    }

    // Try to find JSON in markdown code block
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            let extracted = trimmed[json_start..json_start + end].trim();
            return extract_balanced_json(extracted);
        }
    }

    // Try to find JSON in generic code block
    if let Some(start) = trimmed.find("```") {
        let after_backticks = &trimmed[start + 3..];
        // Skip optional language identifier
        let json_start = after_backticks.find('\n').map(|i| i + 1).unwrap_or(0);
        if let Some(end) = after_backticks[json_start..].find("```") {
            let extracted = after_backticks[json_start..json_start + end].trim();
            return extract_balanced_json(extracted);
        }
    }

    // Try to find a JSON object in the text
    if let Some(start) = trimmed.find('{') {
        return extract_balanced_json(&trimmed[start..]);
    }

    trimmed
}

/// Extract a balanced JSON object from a string that starts with '{'.
///
/// This handles cases where the model adds trailing characters like extra
/// braces: `{"interest_level": ...}}}` -> `{"interest_level": ...}`.
fn extract_balanced_json(s: &str) -> &str {
    if !s.starts_with('{') {
        return s;
    }

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => {
                escape_next = true;
            }
            '"' => {
                in_string = !in_string;
            }
            '{' if !in_string => {
                depth += 1;
            }
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    // Found the matching closing brace
                    return &s[..=i];
                }
            }
            _ => {}
        }
    }

    // No balanced object found; let the parser report the problem
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_build_transcript() {
        let now = Utc::now();
        let messages = vec![
            ConversationMessage::inbound("Is this still available?", now),
            ConversationMessage::outbound("It is! Want me to hold one for you?", now),
            ConversationMessage::inbound("Yes please", now),
        ];

        let transcript = build_transcript(&messages);
        assert_eq!(
            transcript,
            "Customer: Is this still available?\n\
             Agent: It is! Want me to hold one for you?\n\
             Customer: Yes please"
        );
    }

    #[test]
    fn test_parse_plain_json() {
        let response = r#"{
            "interest_level": "interested",
            "interest_score": 72,
            "interest_reason": "asked about pricing twice",
            "key_topics": ["pricing"],
            "objections": [],
            "positive_signals": ["How much does it cost?"],
            "negative_signals": []
        }"#;

        let analysis = parse_analysis(response).unwrap();
        assert_eq!(analysis.interest_level, InterestLevel::Interested);
        assert_eq!(analysis.interest_score, 72);
        assert_eq!(analysis.key_topics, vec!["pricing"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "Here is the analysis:\n```json\n{\"interest_level\": \"not_interested\", \"interest_score\": 20}\n```";

        let analysis = parse_analysis(response).unwrap();
        assert_eq!(analysis.interest_level, InterestLevel::NotInterested);
        assert_eq!(analysis.interest_score, 20);
        // Omitted fields get defaults.
        assert!(analysis.interest_reason.is_empty());
        assert!(analysis.key_topics.is_empty());
    }

    #[test]
    fn test_parse_applies_defaults_for_missing_fields() {
        let analysis = parse_analysis("{}").unwrap();
        assert_eq!(analysis.interest_level, InterestLevel::Neutral);
        assert_eq!(analysis.interest_score, 50);
    }

    #[test]
    fn test_parse_clamps_score() {
        let analysis = parse_analysis(r#"{"interest_score": 250}"#).unwrap();
        assert_eq!(analysis.interest_score, 100);

        let analysis = parse_analysis(r#"{"interest_score": -3}"#).unwrap();
        assert_eq!(analysis.interest_score, 0);
    }

    #[test]
    fn test_parse_trailing_garbage() {
        let response = r#"{"interest_level": "neutral", "interest_score": 50}}}"#;
        let analysis = parse_analysis(response).unwrap();
        assert_eq!(analysis.interest_level, InterestLevel::Neutral);
    }

    #[test]
    fn test_parse_non_json_fails() {
        let result = parse_analysis("The customer seems pretty interested to me!");
        assert!(matches!(result, Err(InsightError::Parse(_))));
    }

    #[test]
    fn test_hash_prompt_is_stable() {
        let a = hash_prompt(SYSTEM_PROMPT);
        let b = hash_prompt(SYSTEM_PROMPT);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_ne!(a, hash_prompt("something else"));
    }
}
