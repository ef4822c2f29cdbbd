//! Core domain types for the Trellis engagement engine.
//!
//! This crate provides the shared vocabulary for the rest of the workspace:
//!
//! - [`phone`] - Phone identity resolution (normalization and fuzzy matching)
//! - [`MessageEvent`] - An inbound/outbound message tied to a contact
//! - [`QualificationCategory`] / [`InterestLevel`] - Interest classification enums
//! - [`HistoryEntry`] / [`ChatTurn`] - Bounded conversation memory entries
//!
//! # Example
//!
//! ```rust
//! use contact_core::phone;
//!
//! assert_eq!(phone::normalize("+1 (415) 555-0100"), "14155550100");
//! assert!(phone::matches("+1 415 555 0100", "4155550100"));
//! ```

mod event;
pub mod phone;

pub use event::{
    ChatTurn, ConversationMessage, Direction, HistoryEntry, HistoryRole, InterestLevel,
    LeadSource, MessageEvent, QualificationCategory,
};
pub use phone::PhoneQuery;
