//! Governance module - deriving who a pull request is waiting on
//!
//! Classifies open pull requests into waiting-responsibility states and
//! rolls those states up into waiting-time buckets.

pub mod buckets;
pub mod classifier;

pub use buckets::{waiting_buckets, WaitingBucket};
pub use classifier::{classify, classify_full, Classification, GovernanceState};
