//! Keyword-driven contact qualification.
//!
//! The fast, cheap half of the interest assessment: a deterministic
//! dictionary classifier scores each message ([`analyze_message`]), and a
//! monotonic state machine folds per-message results into the contact's
//! stored [`database::Qualification`]. The richer LLM-based assessment
//! lives in the `insight` crate and is maintained independently.

mod error;
mod keywords;
mod merge;
mod service;

pub use error::{QualifierError, Result};
pub use keywords::{analyze_message, MessageAnalysis, BASE_SCORE};
pub use merge::merge_assessment;
pub use service::{
    create_or_update_qualification, update_qualification_category, update_qualification_notes,
    QualificationUpdate,
};
