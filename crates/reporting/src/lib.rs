//! Aggregate reporting over qualification and analytics records.
//!
//! Read-side only: counts, percentages, and group-bys. Percentages are
//! rounded to whole numbers and an empty dataset yields all-zero stats
//! (never a division by zero).

mod analytics;
mod qualification;

pub use analytics::{analytics_summary, AnalyticsSummary, InterestLevelCount, TopAgent};
pub use qualification::{
    qualification_report, qualification_stats, GroupReport, QualificationReport,
    QualificationStats,
};
