//! Waiting-time buckets
//!
//! Rolls per-PR classifications up into one bucket per open governance
//! state: how many PRs sit there, the median wait, and the longest-waiting
//! PR. Terminal states are excluded. All classification rules live in the
//! classifier; this module only groups its output.

use crate::config::GovernanceConfig;
use crate::events::{EventStore, Repo};
use crate::governance::classifier::{classify_full, Classification, GovernanceState};
use crate::roles::RoleDirectory;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// One governance state's slice of the open-PR population
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingBucket {
    pub state: GovernanceState,
    pub count: usize,
    /// Median days since the last qualifying action, over members that
    /// have one
    pub median_wait_days: Option<f64>,
    /// The longest-waiting PR in this bucket
    pub oldest_pr: Option<u64>,
}

/// Open states, in the order buckets are reported
const OPEN_STATES: [GovernanceState; 5] = [
    GovernanceState::WaitingOnEditor,
    GovernanceState::WaitingOnAuthor,
    GovernanceState::Stalled,
    GovernanceState::Draft,
    GovernanceState::NoState,
];

/// Classify every known PR (bounded fan-out) and group into buckets.
///
/// A failed item is logged and skipped; it never fails its siblings.
pub async fn waiting_buckets(
    events: &EventStore,
    roles: &RoleDirectory,
    config: &GovernanceConfig,
    repo: Option<Repo>,
    as_of: DateTime<Utc>,
) -> Vec<WaitingBucket> {
    let prs = events.known_prs(repo).await;
    let role_map = Arc::new(roles.snapshot().await);
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_rollups));
    let stall_threshold = config.stall_threshold();

    let mut set: JoinSet<Option<(u64, Classification)>> = JoinSet::new();
    for (pr_repo, pr_number) in prs {
        let store = events.clone();
        let role_map = Arc::clone(&role_map);
        let semaphore = Arc::clone(&semaphore);
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok()?;
            let pr_events = store.events_for_pr(pr_repo, pr_number).await;
            Some((
                pr_number,
                classify_full(&pr_events, &role_map, as_of, stall_threshold),
            ))
        });
    }

    let mut classified: Vec<(u64, Classification)> = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Some(item)) => classified.push(item),
            Ok(None) => {}
            Err(e) => warn!("bucket rollup item failed: {}", e),
        }
    }

    let mut by_state: HashMap<GovernanceState, Vec<(u64, Classification)>> = HashMap::new();
    for (pr_number, classification) in classified {
        if classification.state.is_terminal() {
            continue;
        }
        by_state
            .entry(classification.state)
            .or_default()
            .push((pr_number, classification));
    }

    OPEN_STATES
        .iter()
        .map(|state| {
            let members = by_state.remove(state).unwrap_or_default();
            let mut waits: Vec<i64> = members
                .iter()
                .filter_map(|(_, c)| c.waiting_since)
                .map(|since| (as_of - since).num_days())
                .collect();
            waits.sort_unstable();

            let oldest_pr = members
                .iter()
                .filter_map(|(pr, c)| c.waiting_since.map(|since| (since, *pr)))
                .min()
                .map(|(_, pr)| pr);

            WaitingBucket {
                state: *state,
                count: members.len(),
                median_wait_days: median(&waits),
                oldest_pr,
            }
        })
        .collect()
}

fn median(sorted: &[i64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2] as f64)
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0)
    }
}
