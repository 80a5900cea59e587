//! Presentation color table
//!
//! The only place that knows which color a timeline entry renders in.
//! Kept outside the merger so display tweaks never touch ordering rules.

use crate::events::{EventPayload, Status};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const CYAN: &str = "cyan";
pub const GRAY: &str = "gray";
pub const BLUE: &str = "blue";
pub const VIOLET: &str = "violet";
pub const AMBER: &str = "amber";
pub const EMERALD: &str = "emerald";
pub const RED: &str = "red";
pub const ORANGE: &str = "orange";
pub const PURPLE: &str = "purple";

static STATUS_COLORS: Lazy<HashMap<Status, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (Status::Idea, GRAY),
        (Status::Draft, CYAN),
        (Status::Review, BLUE),
        (Status::LastCall, ORANGE),
        (Status::Final, EMERALD),
        (Status::Stagnant, GRAY),
        (Status::Withdrawn, RED),
        (Status::Living, PURPLE),
    ])
});

/// Color for a status-change entry, keyed by the target status
pub fn status_color(status: Status) -> &'static str {
    STATUS_COLORS.get(&status).copied().unwrap_or(GRAY)
}

/// Color for any timeline entry.
///
/// `pr_merged` tells whether the event's PR eventually merged; open-PR
/// entries render cyan on merged PRs and gray otherwise.
pub fn color_for(payload: &EventPayload, pr_merged: bool) -> &'static str {
    match payload {
        EventPayload::Created => CYAN,
        EventPayload::StatusChange { to, .. } => status_color(*to),
        EventPayload::CategoryChange { .. } => VIOLET,
        EventPayload::DeadlineChange { .. } => AMBER,
        EventPayload::PrOpened { .. } | EventPayload::DraftToggled { .. } => {
            if pr_merged {
                CYAN
            } else {
                GRAY
            }
        }
        EventPayload::PrReview { .. } => BLUE,
        EventPayload::PrComment { .. } => GRAY,
        EventPayload::PrMerged { .. } => EMERALD,
        EventPayload::PrClosed { .. } => RED,
        EventPayload::Commit { .. } => GRAY,
    }
}
