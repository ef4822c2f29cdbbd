//! Fixed keyword dictionaries and the single-message classifier.

use contact_core::QualificationCategory;

/// Buying-intent signals.
const POSITIVE_KEYWORDS: &[&str] = &[
    // Pricing questions
    "price", "pricing", "how much", "quote",
    // Scheduling intent
    "book", "booking", "schedule", "appointment", "demo",
    // Purchase intent
    "buy", "purchase", "sign me up", "want",
    // Engagement
    "interested in", "tell me more", "more info", "sounds good", "yes please",
];

/// Opt-out / disinterest signals.
const NEGATIVE_KEYWORDS: &[&str] = &[
    "stop", "unsubscribe", "not interested", "no thanks", "no thank you",
    "wrong number", "don't contact", "do not contact", "leave me alone",
    "remove me", "spam", "go away",
];

/// Neutral starting score for a message with no signals.
pub const BASE_SCORE: i64 = 50;
/// Score boost per matched positive keyword.
const POSITIVE_BOOST: i64 = 15;
/// Score penalty applied when opt-out language is present.
const NEGATIVE_PENALTY: i64 = 20;

const MIN_SCORE: i64 = 0;
const MAX_SCORE: i64 = 100;

/// Classification of a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAnalysis {
    pub category: QualificationCategory,
    /// Interest score, always within 0-100.
    pub score: i64,
    /// Dictionary entries found in the message.
    pub keywords: Vec<String>,
}

impl MessageAnalysis {
    /// The no-signal result.
    fn pending() -> Self {
        Self {
            category: QualificationCategory::Pending,
            score: BASE_SCORE,
            keywords: Vec::new(),
        }
    }
}

/// Classify one message against the fixed dictionaries.
///
/// Matching is case-insensitive substring search. Opt-out language takes
/// precedence: when any negative keyword is present the message classifies
/// as `not_interested` and positive matches are not considered or reported.
/// The opt-out penalty is applied once per message (floored at 0); positive
/// matches add 15 each, capped at 100.
pub fn analyze_message(text: &str) -> MessageAnalysis {
    let lowered = text.to_lowercase();

    let negative = matched(&lowered, NEGATIVE_KEYWORDS);
    if !negative.is_empty() {
        return MessageAnalysis {
            category: QualificationCategory::NotInterested,
            score: (BASE_SCORE - NEGATIVE_PENALTY).max(MIN_SCORE),
            keywords: negative,
        };
    }

    let positive = matched(&lowered, POSITIVE_KEYWORDS);
    if !positive.is_empty() {
        let score = (BASE_SCORE + POSITIVE_BOOST * positive.len() as i64).min(MAX_SCORE);
        return MessageAnalysis {
            category: QualificationCategory::Interested,
            score,
            keywords: positive,
        };
    }

    MessageAnalysis::pending()
}

fn matched(lowered: &str, dictionary: &[&str]) -> Vec<String> {
    dictionary
        .iter()
        .filter(|kw| lowered.contains(**kw))
        .map(|kw| kw.to_string())
        .collect()
}
