//! Lifecycle funnel
//!
//! Tracks linked pull requests through opened → reviewed → merged or
//! closed-unmerged. Counts PRs, not events; a PR enters the funnel in the
//! year it was opened.

use crate::events::{EventPayload, ProposalEvent, Repo};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Funnel stage counts over the selected population of PRs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleFunnel {
    pub opened: usize,
    pub reviewed: usize,
    pub merged: usize,
    pub closed_unmerged: usize,
}

#[derive(Default)]
struct PrProgress {
    opened_year: Option<i32>,
    reviewed: bool,
    merged: bool,
    closed: bool,
}

/// Build the funnel from PR events, optionally restricted to PRs opened in
/// `year`. PRs whose opening was never observed are skipped.
pub fn lifecycle_funnel(events: &[ProposalEvent], year: Option<i32>) -> LifecycleFunnel {
    let mut progress: BTreeMap<(Repo, u64), PrProgress> = BTreeMap::new();

    for event in events {
        let Some(pr_number) = event.payload.pr_number() else {
            continue;
        };
        let entry = progress.entry((event.repo, pr_number)).or_default();
        match &event.payload {
            EventPayload::PrOpened { .. } => {
                entry.opened_year = Some(event.occurred_at.year());
            }
            EventPayload::PrReview { .. } => entry.reviewed = true,
            EventPayload::PrMerged { .. } => entry.merged = true,
            EventPayload::PrClosed { .. } => entry.closed = true,
            _ => {}
        }
    }

    let mut funnel = LifecycleFunnel::default();
    for pr in progress.values() {
        let Some(opened_year) = pr.opened_year else {
            continue;
        };
        if let Some(year) = year {
            if opened_year != year {
                continue;
            }
        }
        funnel.opened += 1;
        if pr.reviewed {
            funnel.reviewed += 1;
        }
        if pr.merged {
            funnel.merged += 1;
        } else if pr.closed {
            funnel.closed_unmerged += 1;
        }
    }
    funnel
}
