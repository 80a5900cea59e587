//! Reporting module - calendar rollups over the derived views
//!
//! Monthly status snapshots and the PR lifecycle funnel. These are thin
//! aggregations over the event log; every classification rule stays in the
//! governance and trending modules.

pub mod funnel;
pub mod monthly;

pub use funnel::{lifecycle_funnel, LifecycleFunnel};
pub use monthly::{monthly_status_snapshot, MonthlySnapshot, StatusCount};
