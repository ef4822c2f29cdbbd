//! The qualification merge state machine.
//!
//! Categories move monotonically away from `pending`: once a contact is
//! `interested` or `not_interested`, automatic merges never move it back.
//! Manual operator overrides bypass this module entirely.

use contact_core::QualificationCategory;

use crate::keywords::MessageAnalysis;

/// Merge a new single-message analysis into a stored category/score pair.
///
/// Rules, in order:
/// 1. new `interested` with a score above the stored one wins;
/// 2. new `not_interested` always wins (explicit negative signal);
/// 3. a stored `pending` adopts any non-pending analysis;
/// 4. otherwise the stored pair is unchanged.
pub fn merge_assessment(
    stored_category: QualificationCategory,
    stored_score: i64,
    analysis: &MessageAnalysis,
) -> (QualificationCategory, i64) {
    match analysis.category {
        QualificationCategory::Interested if analysis.score > stored_score => {
            (QualificationCategory::Interested, analysis.score)
        }
        QualificationCategory::NotInterested => {
            (QualificationCategory::NotInterested, analysis.score)
        }
        category if stored_category == QualificationCategory::Pending
            && category != QualificationCategory::Pending =>
        {
            (category, analysis.score)
        }
        _ => (stored_category, stored_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn analysis(category: QualificationCategory, score: i64) -> MessageAnalysis {
        MessageAnalysis {
            category,
            score,
            keywords: Vec::new(),
        }
    }

    #[test]
    fn test_interested_needs_higher_score() {
        let (cat, score) = merge_assessment(
            QualificationCategory::Interested,
            80,
            &analysis(QualificationCategory::Interested, 65),
        );
        assert_eq!(cat, QualificationCategory::Interested);
        assert_eq!(score, 80);

        let (cat, score) = merge_assessment(
            QualificationCategory::Interested,
            65,
            &analysis(QualificationCategory::Interested, 80),
        );
        assert_eq!(cat, QualificationCategory::Interested);
        assert_eq!(score, 80);
    }

    #[test]
    fn test_not_interested_always_wins() {
        let (cat, score) = merge_assessment(
            QualificationCategory::Interested,
            100,
            &analysis(QualificationCategory::NotInterested, 30),
        );
        assert_eq!(cat, QualificationCategory::NotInterested);
        assert_eq!(score, 30);
    }

    #[test]
    fn test_pending_adopts_first_signal() {
        let (cat, score) = merge_assessment(
            QualificationCategory::Pending,
            50,
            &analysis(QualificationCategory::Interested, 50),
        );
        assert_eq!(cat, QualificationCategory::Interested);
        assert_eq!(score, 50);
    }

    #[test]
    fn test_pending_analysis_changes_nothing() {
        for stored in [
            QualificationCategory::Pending,
            QualificationCategory::Interested,
            QualificationCategory::NotInterested,
        ] {
            let (cat, score) =
                merge_assessment(stored, 42, &analysis(QualificationCategory::Pending, 50));
            assert_eq!(cat, stored);
            assert_eq!(score, 42);
        }
    }

    #[test]
    fn test_interested_can_follow_not_interested() {
        // Monotonicity only forbids returning to pending; a strong positive
        // signal can still flip a negative classification.
        let (cat, score) = merge_assessment(
            QualificationCategory::NotInterested,
            30,
            &analysis(QualificationCategory::Interested, 65),
        );
        assert_eq!(cat, QualificationCategory::Interested);
        assert_eq!(score, 65);
    }

    fn category_strategy() -> impl Strategy<Value = QualificationCategory> {
        prop_oneof![
            Just(QualificationCategory::Interested),
            Just(QualificationCategory::NotInterested),
            Just(QualificationCategory::Pending),
        ]
    }

    proptest! {
        /// Once the category leaves pending it never returns, for any
        /// sequence of analyses.
        #[test]
        fn prop_category_never_reverts_to_pending(
            sequence in prop::collection::vec((category_strategy(), 0i64..=100), 1..40)
        ) {
            let mut category = QualificationCategory::Pending;
            let mut score = 50;
            let mut left_pending = false;

            for (new_category, new_score) in sequence {
                let (merged_category, merged_score) =
                    merge_assessment(category, score, &analysis(new_category, new_score));
                category = merged_category;
                score = merged_score;

                if category != QualificationCategory::Pending {
                    left_pending = true;
                }
                if left_pending {
                    prop_assert_ne!(category, QualificationCategory::Pending);
                }
                prop_assert!((0..=100).contains(&score));
            }
        }
    }
}
