//! Governance state classifier
//!
//! Derives a single waiting-responsibility state for a pull request from its
//! ordered event list and a query time. Pure and total: any well-typed input
//! yields a state, never an error.

use crate::events::{EventPayload, ProposalEvent};
use crate::roles::ActorRole;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Computed governance state of a pull request
///
/// Serialized in SCREAMING_SNAKE_CASE because downstream displays key off
/// those exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GovernanceState {
    WaitingOnEditor,
    WaitingOnAuthor,
    Stalled,
    Draft,
    NoState,
    Merged,
    Closed,
}

impl GovernanceState {
    /// True for states a PR can never leave
    pub fn is_terminal(&self) -> bool {
        matches!(self, GovernanceState::Merged | GovernanceState::Closed)
    }
}

/// Classification with the timestamp the wait is measured from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub state: GovernanceState,
    /// Time of the last qualifying action; absent for terminal and NO_STATE
    pub waiting_since: Option<DateTime<Utc>>,
}

/// Whose court the ball landed in after a qualifying action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionSide {
    Editor,
    Author,
}

/// Classify a pull request as of `as_of`.
///
/// `pr_events` is the PR's full event list; events after `as_of` are
/// ignored so earlier states can be reconstructed from the same input.
pub fn classify(
    pr_events: &[ProposalEvent],
    roles: &HashMap<String, ActorRole>,
    as_of: DateTime<Utc>,
    stall_threshold: Duration,
) -> GovernanceState {
    classify_full(pr_events, roles, as_of, stall_threshold).state
}

/// Full classification, exposing the waiting-since timestamp the
/// waiting-time rollups are built on.
pub fn classify_full(
    pr_events: &[ProposalEvent],
    roles: &HashMap<String, ActorRole>,
    as_of: DateTime<Utc>,
    stall_threshold: Duration,
) -> Classification {
    let mut visible: Vec<&ProposalEvent> = pr_events
        .iter()
        .filter(|e| e.occurred_at <= as_of)
        .collect();
    // Inputs usually arrive sorted, but classification must not depend on it.
    visible.sort_by_key(|e| e.sort_key());

    if visible.is_empty() {
        return Classification {
            state: GovernanceState::NoState,
            waiting_since: None,
        };
    }

    // Terminal states are sticky: once merged or closed, nothing after
    // matters.
    if visible
        .iter()
        .any(|e| matches!(e.payload, EventPayload::PrMerged { .. }))
    {
        return Classification {
            state: GovernanceState::Merged,
            waiting_since: None,
        };
    }
    if visible
        .iter()
        .any(|e| matches!(e.payload, EventPayload::PrClosed { .. }))
    {
        return Classification {
            state: GovernanceState::Closed,
            waiting_since: None,
        };
    }

    // Draft flag as of `as_of`: opened flag, overridden by later toggles.
    let mut draft = false;
    for event in &visible {
        match &event.payload {
            EventPayload::PrOpened { draft: d, .. } => draft = *d,
            EventPayload::DraftToggled { draft: d, .. } => draft = *d,
            _ => {}
        }
    }

    // Last qualifying action. Opening the PR counts as the author's move;
    // reviews qualify when the reviewer is an editor, commits when the
    // committer is the proposal author, comments for either side by role.
    // `visible` is in (occurred_at, id) order, so overwriting implements
    // the last-writer-wins tie-break.
    let mut last_action: Option<(DateTime<Utc>, ActionSide)> = None;
    for event in &visible {
        let side = match &event.payload {
            EventPayload::PrOpened { .. } => Some(ActionSide::Author),
            EventPayload::PrReview { reviewer, .. } => match roles.get(reviewer) {
                Some(ActorRole::Editor) => Some(ActionSide::Editor),
                _ => None,
            },
            EventPayload::Commit { author, .. } => match roles.get(author) {
                Some(ActorRole::Author) => Some(ActionSide::Author),
                _ => None,
            },
            EventPayload::PrComment { actor, .. } => match roles.get(actor) {
                Some(ActorRole::Editor) => Some(ActionSide::Editor),
                Some(ActorRole::Author) => Some(ActionSide::Author),
                _ => None,
            },
            _ => None,
        };
        if let Some(side) = side {
            last_action = Some((event.occurred_at, side));
        }
    }

    if draft {
        return Classification {
            state: GovernanceState::Draft,
            waiting_since: last_action.map(|(when, _)| when),
        };
    }

    let Some((when, side)) = last_action else {
        // No PR-opened event and no resolvable actors: cannot tell whose
        // turn it is.
        return Classification {
            state: GovernanceState::NoState,
            waiting_since: None,
        };
    };

    // Boundary inclusive: exactly at the threshold is already stalled.
    if as_of - when >= stall_threshold {
        return Classification {
            state: GovernanceState::Stalled,
            waiting_since: Some(when),
        };
    }

    let state = match side {
        ActionSide::Editor => GovernanceState::WaitingOnAuthor,
        ActionSide::Author => GovernanceState::WaitingOnEditor,
    };
    Classification {
        state,
        waiting_since: Some(when),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Repo, ReviewVerdict};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const PR: u64 = 7102;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()
    }

    fn event(id: u64, occurred_at: DateTime<Utc>, payload: EventPayload) -> ProposalEvent {
        ProposalEvent {
            id,
            proposal_number: 7702,
            repo: Repo::Eip,
            occurred_at,
            payload,
        }
    }

    fn opened(id: u64, occurred_at: DateTime<Utc>) -> ProposalEvent {
        event(
            id,
            occurred_at,
            EventPayload::PrOpened {
                pr_number: PR,
                author: "vbuterin".to_string(),
                draft: false,
            },
        )
    }

    fn review(id: u64, occurred_at: DateTime<Utc>, reviewer: &str) -> ProposalEvent {
        event(
            id,
            occurred_at,
            EventPayload::PrReview {
                pr_number: PR,
                reviewer: reviewer.to_string(),
                verdict: ReviewVerdict::ChangesRequested,
            },
        )
    }

    fn comment(id: u64, occurred_at: DateTime<Utc>, actor: &str) -> ProposalEvent {
        event(
            id,
            occurred_at,
            EventPayload::PrComment {
                pr_number: PR,
                actor: actor.to_string(),
            },
        )
    }

    fn roles() -> HashMap<String, ActorRole> {
        let mut map = HashMap::new();
        map.insert("samwilsn".to_string(), ActorRole::Editor);
        map.insert("vbuterin".to_string(), ActorRole::Author);
        map
    }

    fn threshold() -> Duration {
        Duration::days(60)
    }

    #[test]
    fn editor_review_after_author_comment_waits_on_author() {
        let events = vec![
            opened(0, at(1)),
            comment(1, at(2), "vbuterin"),
            review(2, at(3), "samwilsn"),
        ];
        let state = classify(&events, &roles(), at(4), threshold());
        assert_eq!(state, GovernanceState::WaitingOnAuthor);
    }

    #[test]
    fn author_action_after_editor_review_waits_on_editor() {
        let events = vec![
            opened(0, at(1)),
            review(1, at(2), "samwilsn"),
            comment(2, at(3), "vbuterin"),
        ];
        let state = classify(&events, &roles(), at(4), threshold());
        assert_eq!(state, GovernanceState::WaitingOnEditor);
    }

    #[test]
    fn freshly_opened_pr_waits_on_editor() {
        let events = vec![opened(0, at(1))];
        let state = classify(&events, &roles(), at(2), threshold());
        assert_eq!(state, GovernanceState::WaitingOnEditor);
    }

    #[test]
    fn merged_is_terminal_and_sticky() {
        let events = vec![
            opened(0, at(1)),
            event(1, at(2), EventPayload::PrMerged { pr_number: PR }),
            comment(2, at(3), "samwilsn"),
        ];
        assert_eq!(classify(&events, &roles(), at(4), threshold()), GovernanceState::Merged);
        // A much later as_of never reclassifies a terminal state.
        assert_eq!(
            classify(&events, &roles(), at(4) + Duration::days(365), threshold()),
            GovernanceState::Merged
        );
    }

    #[test]
    fn closed_without_merge_is_closed() {
        let events = vec![
            opened(0, at(1)),
            event(1, at(2), EventPayload::PrClosed { pr_number: PR }),
        ];
        assert_eq!(classify(&events, &roles(), at(3), threshold()), GovernanceState::Closed);
    }

    #[test]
    fn draft_flag_wins_over_waiting_states() {
        let events = vec![
            event(
                0,
                at(1),
                EventPayload::PrOpened {
                    pr_number: PR,
                    author: "vbuterin".to_string(),
                    draft: true,
                },
            ),
            review(1, at(2), "samwilsn"),
        ];
        assert_eq!(classify(&events, &roles(), at(3), threshold()), GovernanceState::Draft);
    }

    #[test]
    fn ready_for_review_toggle_clears_draft() {
        let events = vec![
            event(
                0,
                at(1),
                EventPayload::PrOpened {
                    pr_number: PR,
                    author: "vbuterin".to_string(),
                    draft: true,
                },
            ),
            event(
                1,
                at(2),
                EventPayload::DraftToggled {
                    pr_number: PR,
                    draft: false,
                },
            ),
        ];
        assert_eq!(
            classify(&events, &roles(), at(3), threshold()),
            GovernanceState::WaitingOnEditor
        );
    }

    #[test]
    fn stall_boundary_is_inclusive() {
        let events = vec![opened(0, at(1)), review(1, at(2), "samwilsn")];

        // Exactly 60 days after the last action: stalled.
        let state = classify(&events, &roles(), at(2) + Duration::days(60), threshold());
        assert_eq!(state, GovernanceState::Stalled);

        // One day under the boundary: still waiting.
        let state = classify(&events, &roles(), at(2) + Duration::days(59), threshold());
        assert_eq!(state, GovernanceState::WaitingOnAuthor);
    }

    #[test]
    fn sixty_one_days_idle_overrides_waiting_on_editor() {
        let events = vec![opened(0, at(1)), comment(1, at(2), "vbuterin")];
        let state = classify(&events, &roles(), at(2) + Duration::days(61), threshold());
        assert_eq!(state, GovernanceState::Stalled);
    }

    #[test]
    fn timestamp_tie_resolved_by_insertion_order() {
        // Editor review and author comment at the same instant: the later
        // insertion wins.
        let events = vec![
            opened(0, at(1)),
            review(1, at(2), "samwilsn"),
            comment(2, at(2), "vbuterin"),
        ];
        assert_eq!(
            classify(&events, &roles(), at(3), threshold()),
            GovernanceState::WaitingOnEditor
        );

        let events = vec![
            opened(0, at(1)),
            comment(1, at(2), "vbuterin"),
            review(2, at(2), "samwilsn"),
        ];
        assert_eq!(
            classify(&events, &roles(), at(3), threshold()),
            GovernanceState::WaitingOnAuthor
        );
    }

    #[test]
    fn unknown_roles_degrade_to_no_state() {
        // Only a comment from an actor the directory does not know; no
        // opened event to fall back on.
        let events = vec![comment(0, at(1), "anon")];
        assert_eq!(classify(&events, &HashMap::new(), at(2), threshold()), GovernanceState::NoState);
    }

    #[test]
    fn events_after_as_of_are_invisible() {
        let events = vec![
            opened(0, at(1)),
            review(1, at(10), "samwilsn"),
        ];
        // Before the review happened, the PR still waits on an editor.
        assert_eq!(
            classify(&events, &roles(), at(5), threshold()),
            GovernanceState::WaitingOnEditor
        );
    }

    #[test]
    fn classification_is_deterministic_under_permutation() {
        let a = vec![
            opened(0, at(1)),
            review(1, at(2), "samwilsn"),
            comment(2, at(3), "vbuterin"),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(
            classify_full(&a, &roles(), at(4), threshold()),
            classify_full(&b, &roles(), at(4), threshold())
        );
    }

    #[test]
    fn waiting_since_tracks_last_qualifying_action() {
        let events = vec![opened(0, at(1)), review(1, at(5), "samwilsn")];
        let c = classify_full(&events, &roles(), at(10), threshold());
        assert_eq!(c.state, GovernanceState::WaitingOnAuthor);
        assert_eq!(c.waiting_since, Some(at(5)));
    }
}
