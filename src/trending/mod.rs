//! Activity and trending scorer
//!
//! Aggregates recent events per proposal into a ranked activity score. The
//! formula is documented in-product and treated as a contract:
//! `score = (PR events × 2) + comments + (status change ? 10 : 0)`,
//! where PR events are review submissions only.

use crate::events::{EventPayload, ProposalEvent, Repo};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Status-change bonus applied once per window
const STATUS_CHANGE_BONUS: u32 = 10;

/// Per-proposal activity counts within a lookback window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityCounts {
    /// Review submissions (approved / changes requested / review comments)
    pub reviews: u32,
    /// Comments on linked PRs
    pub comments: u32,
    /// Whether the proposal changed status inside the window
    pub status_changed: bool,
    /// Most recent in-window event of any kind
    pub last_activity: DateTime<Utc>,
}

/// A proposal's trending rank entry, valid only for the query's window
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingScore {
    pub proposal_number: u32,
    pub repo: Repo,
    pub score: u32,
    pub reason: String,
    pub last_activity: DateTime<Utc>,
}

/// The documented scoring contract
pub fn score(counts: &ActivityCounts) -> u32 {
    let bonus = if counts.status_changed { STATUS_CHANGE_BONUS } else { 0 };
    counts.reviews * 2 + counts.comments + bonus
}

/// Deterministic one-line explanation of which factor dominated
pub fn reason(counts: &ActivityCounts) -> String {
    let review_points = counts.reviews * 2;
    let comment_points = counts.comments;
    let bonus = if counts.status_changed { STATUS_CHANGE_BONUS } else { 0 };

    // Precedence on ties: reviews, then comments, then the status bonus.
    let dominant = if review_points >= comment_points && review_points >= bonus {
        format!("{} review events", counts.reviews)
    } else if comment_points >= bonus {
        format!("{} comments", counts.comments)
    } else {
        "a status change".to_string()
    };

    let mut detail = vec![format!("{} reviews", counts.reviews), format!("{} comments", counts.comments)];
    if counts.status_changed {
        detail.push("status change".to_string());
    }
    format!("Driven by {} ({})", dominant, detail.join(", "))
}

/// Tally one proposal's window events into activity counts.
///
/// Returns `None` for an empty slice: no activity, nothing to rank.
pub fn tally(window_events: &[ProposalEvent]) -> Option<ActivityCounts> {
    let first = window_events.first()?;
    let mut counts = ActivityCounts {
        reviews: 0,
        comments: 0,
        status_changed: false,
        last_activity: first.occurred_at,
    };
    for event in window_events {
        match &event.payload {
            EventPayload::PrReview { .. } => counts.reviews += 1,
            EventPayload::PrComment { .. } => counts.comments += 1,
            EventPayload::StatusChange { .. } => counts.status_changed = true,
            _ => {}
        }
        if event.occurred_at > counts.last_activity {
            counts.last_activity = event.occurred_at;
        }
    }
    Some(counts)
}

/// Group a window's events by proposal, score each, and rank.
///
/// Descending by score, ties broken by the more recent last activity;
/// zero-score proposals are excluded entirely.
pub fn rank_window(window_events: &[ProposalEvent]) -> Vec<TrendingScore> {
    let mut grouped: BTreeMap<(Repo, u32), Vec<ProposalEvent>> = BTreeMap::new();
    for event in window_events {
        grouped
            .entry((event.repo, event.proposal_number))
            .or_default()
            .push(event.clone());
    }

    let mut ranked: Vec<TrendingScore> = grouped
        .into_iter()
        .filter_map(|((repo, proposal_number), events)| {
            let counts = tally(&events)?;
            let score = score(&counts);
            if score == 0 {
                return None;
            }
            Some(TrendingScore {
                proposal_number,
                repo,
                score,
                reason: reason(&counts),
                last_activity: counts.last_activity,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.last_activity.cmp(&a.last_activity))
            .then(a.proposal_number.cmp(&b.proposal_number))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ReviewVerdict;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 10, 0, 0).unwrap()
    }

    fn event(number: u32, occurred_at: DateTime<Utc>, payload: EventPayload) -> ProposalEvent {
        ProposalEvent {
            id: 0,
            proposal_number: number,
            repo: Repo::Eip,
            occurred_at,
            payload,
        }
    }

    fn review(number: u32, day: u32) -> ProposalEvent {
        event(
            number,
            at(day),
            EventPayload::PrReview {
                pr_number: 1,
                reviewer: "ed".to_string(),
                verdict: ReviewVerdict::Approved,
            },
        )
    }

    fn comment(number: u32, day: u32) -> ProposalEvent {
        event(
            number,
            at(day),
            EventPayload::PrComment {
                pr_number: 1,
                actor: "alice".to_string(),
            },
        )
    }

    fn status_change(number: u32, day: u32) -> ProposalEvent {
        event(
            number,
            at(day),
            EventPayload::StatusChange {
                from: None,
                to: crate::events::Status::Review,
                pr_number: None,
            },
        )
    }

    #[test]
    fn documented_formula_is_reproduced_exactly() {
        // 3 PR events, 5 comments, status change: 3*2 + 5 + 10 = 21.
        let counts = ActivityCounts {
            reviews: 3,
            comments: 5,
            status_changed: true,
            last_activity: at(1),
        };
        assert_eq!(score(&counts), 21);
    }

    #[test]
    fn one_more_review_adds_two_one_more_comment_adds_one() {
        let base = ActivityCounts {
            reviews: 2,
            comments: 3,
            status_changed: false,
            last_activity: at(1),
        };
        let plus_review = ActivityCounts { reviews: 3, ..base };
        let plus_comment = ActivityCounts { comments: 4, ..base };
        assert_eq!(score(&plus_review), score(&base) + 2);
        assert_eq!(score(&plus_comment), score(&base) + 1);
    }

    #[test]
    fn commits_and_merges_do_not_score() {
        let events = vec![
            event(
                1,
                at(1),
                EventPayload::Commit {
                    pr_number: 1,
                    author: "alice".to_string(),
                },
            ),
            event(1, at(2), EventPayload::PrMerged { pr_number: 1 }),
        ];
        let counts = tally(&events).unwrap();
        assert_eq!(score(&counts), 0);
        // Non-scoring events still advance last_activity.
        assert_eq!(counts.last_activity, at(2));
    }

    #[test]
    fn zero_score_proposals_are_excluded() {
        let window = vec![event(
            1,
            at(1),
            EventPayload::Commit {
                pr_number: 1,
                author: "alice".to_string(),
            },
        )];
        assert!(rank_window(&window).is_empty());
    }

    #[test]
    fn ranking_descends_by_score_then_recency() {
        let window = vec![
            // Proposal 1: one review = 2 points, last activity day 1.
            review(1, 1),
            // Proposal 2: two comments = 2 points, last activity day 3.
            comment(2, 2),
            comment(2, 3),
            // Proposal 3: status change = 10 points.
            status_change(3, 2),
        ];
        let ranked = rank_window(&window);
        let order: Vec<u32> = ranked.iter().map(|t| t.proposal_number).collect();
        // 3 leads on score; 2 and 1 tie on score, 2 is more recent.
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn reason_text_is_deterministic() {
        let counts = ActivityCounts {
            reviews: 3,
            comments: 5,
            status_changed: true,
            last_activity: at(1),
        };
        assert_eq!(reason(&counts), reason(&counts));
        // The 10-point bonus outweighs 6 review points and 5 comment points.
        assert!(reason(&counts).starts_with("Driven by a status change"));

        let review_heavy = ActivityCounts {
            reviews: 6,
            comments: 2,
            status_changed: false,
            last_activity: at(1),
        };
        assert!(reason(&review_heavy).starts_with("Driven by 6 review events"));
    }
}
