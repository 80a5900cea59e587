//! Timeline merger
//!
//! Combines a proposal's event streams into one chronologically sorted,
//! typed sequence. Pure and deterministic: identical input sets yield the
//! same output regardless of input array order.

use crate::events::{EventPayload, ProposalEvent, ReviewVerdict};
use crate::timeline::style;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Collapsed display kind of a timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Created,
    Status,
    Category,
    Deadline,
    PrOpened,
    PrReview,
    PrComment,
    PrMerged,
    PrClosed,
    Commit,
}

/// One row of the unified lifecycle narrative
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedTimelineEntry {
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub description: String,
    pub color: &'static str,
}

/// Merge a proposal's event streams into one ordered timeline.
///
/// Entries ascend by date; timestamp ties keep the event-log insertion
/// order. Empty inputs yield an empty timeline.
pub fn merge(
    creation: Option<&ProposalEvent>,
    status_events: &[ProposalEvent],
    category_events: &[ProposalEvent],
    deadline_events: &[ProposalEvent],
    pr_events: &[ProposalEvent],
) -> Vec<UnifiedTimelineEntry> {
    // PRs that eventually merged render their open events differently.
    let merged_prs: HashSet<u64> = pr_events
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::PrMerged { pr_number } => Some(*pr_number),
            _ => None,
        })
        .collect();

    let mut keyed: Vec<(DateTime<Utc>, u64, UnifiedTimelineEntry)> = creation
        .into_iter()
        .chain(status_events)
        .chain(category_events)
        .chain(deadline_events)
        .chain(pr_events)
        .map(|event| {
            let pr_merged = event
                .payload
                .pr_number()
                .map_or(false, |n| merged_prs.contains(&n));
            let entry = UnifiedTimelineEntry {
                date: event.occurred_at,
                entry_type: entry_type(&event.payload),
                description: describe(&event.payload),
                color: style::color_for(&event.payload, pr_merged),
            };
            (event.occurred_at, event.id, entry)
        })
        .collect();

    keyed.sort_by_key(|(date, id, _)| (*date, *id));
    keyed.into_iter().map(|(_, _, entry)| entry).collect()
}

fn entry_type(payload: &EventPayload) -> EntryType {
    match payload {
        EventPayload::Created => EntryType::Created,
        EventPayload::StatusChange { .. } => EntryType::Status,
        EventPayload::CategoryChange { .. } => EntryType::Category,
        EventPayload::DeadlineChange { .. } => EntryType::Deadline,
        EventPayload::PrOpened { .. } | EventPayload::DraftToggled { .. } => EntryType::PrOpened,
        EventPayload::PrReview { .. } => EntryType::PrReview,
        EventPayload::PrComment { .. } => EntryType::PrComment,
        EventPayload::PrMerged { .. } => EntryType::PrMerged,
        EventPayload::PrClosed { .. } => EntryType::PrClosed,
        EventPayload::Commit { .. } => EntryType::Commit,
    }
}

fn describe(payload: &EventPayload) -> String {
    match payload {
        EventPayload::Created => "Proposal created".to_string(),
        EventPayload::StatusChange { from, to, .. } => match from {
            Some(from) => format!("{} → {}", from, to),
            None => format!("Set to {}", to),
        },
        EventPayload::CategoryChange { from, to } => match from {
            Some(from) => format!("Category {} → {}", from, to),
            None => format!("Category set to {}", to),
        },
        EventPayload::DeadlineChange { deadline } => match deadline {
            Some(date) => format!("Last Call deadline set to {}", date),
            None => "Last Call deadline cleared".to_string(),
        },
        EventPayload::PrOpened { pr_number, author, draft } => {
            if *draft {
                format!("PR #{} opened as draft by {}", pr_number, author)
            } else {
                format!("PR #{} opened by {}", pr_number, author)
            }
        }
        EventPayload::PrReview { pr_number, reviewer, verdict } => {
            let verdict = match verdict {
                ReviewVerdict::Approved => "approved",
                ReviewVerdict::ChangesRequested => "requested changes",
                ReviewVerdict::Commented => "reviewed",
            };
            format!("{} {} PR #{}", reviewer, verdict, pr_number)
        }
        EventPayload::PrComment { pr_number, actor } => {
            format!("{} commented on PR #{}", actor, pr_number)
        }
        EventPayload::PrMerged { pr_number } => format!("PR #{} merged", pr_number),
        EventPayload::PrClosed { pr_number } => format!("PR #{} closed", pr_number),
        EventPayload::DraftToggled { pr_number, draft } => {
            if *draft {
                format!("PR #{} converted to draft", pr_number)
            } else {
                format!("PR #{} marked ready for review", pr_number)
            }
        }
        EventPayload::Commit { pr_number, author } => {
            format!("{} pushed to PR #{}", author, pr_number)
        }
    }
}
