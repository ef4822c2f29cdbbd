//! Phone identity resolution.
//!
//! Contacts arrive with inconsistently formatted phone numbers: with or
//! without a country code, with punctuation, with whitespace. This module
//! reduces them to a digits-only canonical form and compares them with a
//! suffix heuristic so that `+1 (415) 555-0100` and `4155550100` resolve to
//! the same contact.

/// Minimum digits on both sides before the suffix rule applies.
///
/// Below this length two numbers only match on exact equality; the last-10
/// rule would otherwise collapse short codes and malformed input.
pub const SUFFIX_DIGITS: usize = 10;

/// Reduce a phone number to its digits.
///
/// Everything that is not an ASCII digit is dropped: `+`, spaces, dashes,
/// parentheses, extension markers.
pub fn normalize(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Compare two phone numbers for identity.
///
/// Returns true when the normalized forms are equal, or when both have at
/// least [`SUFFIX_DIGITS`] digits and their last [`SUFFIX_DIGITS`] digits are
/// equal (country-code prefix variance).
///
/// This is a heuristic, not a guarantee: two distinct international numbers
/// sharing a 10-digit tail will match. Callers treat this as a known
/// limitation of phone-keyed identity.
pub fn matches(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return !a.is_empty();
    }

    if a.len() >= SUFFIX_DIGITS && b.len() >= SUFFIX_DIGITS {
        return suffix(&a) == suffix(&b);
    }

    false
}

/// The last [`SUFFIX_DIGITS`] digits of an already-normalized number.
fn suffix(digits: &str) -> &str {
    &digits[digits.len() - SUFFIX_DIGITS..]
}

/// A pre-resolved phone lookup, ready to hand to the storage layer.
///
/// Every query against phone-keyed tables goes through this rather than raw
/// string equality, so lookups share the same match semantics as
/// [`matches`]: exact on the normalized form, or last-10-digit suffix when
/// the input is long enough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneQuery {
    /// Digits-only form of the input.
    pub normalized: String,
    /// Last 10 digits, present only when the input has at least 10.
    pub suffix: Option<String>,
}

impl PhoneQuery {
    /// Build a query from raw caller input.
    pub fn new(phone: &str) -> Self {
        let normalized = normalize(phone);
        let suffix = if normalized.len() >= SUFFIX_DIGITS {
            Some(suffix(&normalized).to_string())
        } else {
            None
        };

        Self { normalized, suffix }
    }

    /// Whether the input contained any digits at all.
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("+1 (415) 555-0100"), "14155550100");
        assert_eq!(normalize("415.555.0100"), "4155550100");
        assert_eq!(normalize("  415 555 0100  "), "4155550100");
    }

    #[test]
    fn test_normalize_empty_and_garbage() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("call me"), "");
        assert_eq!(normalize("+-() "), "");
    }

    #[test]
    fn test_matches_exact() {
        assert!(matches("4155550100", "415-555-0100"));
        assert!(matches("+521234", "521234"));
    }

    #[test]
    fn test_matches_country_code_variants() {
        assert!(matches("+1 415 555 0100", "4155550100"));
        assert!(matches("14155550100", "+44 1 415 555 0100")); // shared 10-digit tail
        assert!(matches("+55 11 91234-5678", "11912345678"));
    }

    #[test]
    fn test_short_numbers_need_exact_equality() {
        // Below 10 digits the suffix rule is off.
        assert!(!matches("5550100", "15550100"));
        assert!(matches("5550100", "555-0100"));
    }

    #[test]
    fn test_empty_never_matches() {
        assert!(!matches("", ""));
        assert!(!matches("", "4155550100"));
        assert!(!matches("abc", "def"));
    }

    #[test]
    fn test_phone_query() {
        let q = PhoneQuery::new("+1 (415) 555-0100");
        assert_eq!(q.normalized, "14155550100");
        assert_eq!(q.suffix.as_deref(), Some("4155550100"));

        let short = PhoneQuery::new("555-0100");
        assert_eq!(short.normalized, "5550100");
        assert!(short.suffix.is_none());

        assert!(PhoneQuery::new("n/a").is_empty());
    }
}
