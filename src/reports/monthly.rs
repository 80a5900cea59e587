//! Monthly status snapshot
//!
//! For one calendar year: how many distinct proposals entered each status
//! per month, derived from status-change targets.

use crate::events::{EventPayload, ProposalEvent, Repo, Status};
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Proposals entering one status in one month
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

/// One month's slice of the snapshot; months without activity are omitted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    pub month: u32,
    pub statuses: Vec<StatusCount>,
}

/// Roll status-change events up into per-month entry counts for `year`.
///
/// A proposal entering the same status twice in one month counts once.
pub fn monthly_status_snapshot(events: &[ProposalEvent], year: i32) -> Vec<MonthlySnapshot> {
    let mut entered: BTreeMap<(u32, Status), BTreeSet<(Repo, u32)>> = BTreeMap::new();

    for event in events {
        if event.occurred_at.year() != year {
            continue;
        }
        if let EventPayload::StatusChange { to, .. } = &event.payload {
            entered
                .entry((event.occurred_at.month(), *to))
                .or_default()
                .insert((event.repo, event.proposal_number));
        }
    }

    let mut months: BTreeMap<u32, Vec<StatusCount>> = BTreeMap::new();
    for ((month, status), proposals) in entered {
        months.entry(month).or_default().push(StatusCount {
            status,
            count: proposals.len(),
        });
    }

    months
        .into_iter()
        .map(|(month, statuses)| MonthlySnapshot { month, statuses })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn status_event(
        id: u64,
        number: u32,
        month: u32,
        day: u32,
        to: Status,
    ) -> ProposalEvent {
        ProposalEvent {
            id,
            proposal_number: number,
            repo: Repo::Eip,
            occurred_at: Utc.with_ymd_and_hms(2023, month, day, 0, 0, 0).unwrap(),
            payload: EventPayload::StatusChange {
                from: None,
                to,
                pr_number: None,
            },
        }
    }

    #[test]
    fn groups_by_month_and_counts_distinct_proposals() {
        let events = vec![
            status_event(0, 100, 1, 5, Status::Draft),
            status_event(1, 200, 1, 9, Status::Draft),
            // Same proposal entering Draft twice in January counts once.
            status_event(2, 100, 1, 20, Status::Draft),
            status_event(3, 100, 3, 1, Status::Review),
        ];

        let snapshot = monthly_status_snapshot(&events, 2023);
        assert_eq!(snapshot.len(), 2);

        assert_eq!(snapshot[0].month, 1);
        assert_eq!(snapshot[0].statuses.len(), 1);
        assert_eq!(snapshot[0].statuses[0].status, Status::Draft);
        assert_eq!(snapshot[0].statuses[0].count, 2);

        assert_eq!(snapshot[1].month, 3);
        assert_eq!(snapshot[1].statuses[0].status, Status::Review);
        assert_eq!(snapshot[1].statuses[0].count, 1);
    }

    #[test]
    fn other_years_are_excluded() {
        let events = vec![status_event(0, 100, 6, 1, Status::Final)];
        assert!(monthly_status_snapshot(&events, 2024).is_empty());
    }
}
