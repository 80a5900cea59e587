//! Timeline module - one chronological story per proposal
//!
//! Merges the heterogeneous event streams of a proposal (status, category,
//! deadline, linked PRs) into a single ordered narrative. Display colors
//! live in a separate style table, never in the merge logic.

pub mod merger;
pub mod style;

pub use merger::{merge, EntryType, UnifiedTimelineEntry};
