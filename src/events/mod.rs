//! Proposal event model
//!
//! The append-only facts everything else is derived from: proposal status
//! transitions, category and Last Call deadline changes, and the lifecycle
//! of the pull requests linked to a proposal.

mod store;

pub use store::EventStore;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which proposals repository an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repo {
    Eip,
    Erc,
    Rip,
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Repo::Eip => "eip",
            Repo::Erc => "erc",
            Repo::Rip => "rip",
        };
        write!(f, "{}", s)
    }
}

/// EIP-1 lifecycle statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Idea,
    Draft,
    Review,
    LastCall,
    Final,
    Stagnant,
    Withdrawn,
    Living,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Idea => "Idea",
            Status::Draft => "Draft",
            Status::Review => "Review",
            Status::LastCall => "Last Call",
            Status::Final => "Final",
            Status::Stagnant => "Stagnant",
            Status::Withdrawn => "Withdrawn",
            Status::Living => "Living",
        };
        write!(f, "{}", s)
    }
}

/// Review verdicts on a linked pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    Approved,
    ChangesRequested,
    Commented,
}

/// Kind-specific payload of a proposal event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", rename_all_fields = "camelCase", tag = "kind")]
pub enum EventPayload {
    /// Proposal document first appeared in the repository
    Created,
    /// Status transition (from is absent for the initial status)
    StatusChange {
        from: Option<Status>,
        to: Status,
        pr_number: Option<u64>,
    },
    /// Category transition (e.g. Core -> Networking)
    CategoryChange {
        from: Option<String>,
        to: String,
    },
    /// Last Call deadline set, moved, or cleared
    DeadlineChange {
        deadline: Option<NaiveDate>,
    },
    /// A pull request touching this proposal was opened
    PrOpened {
        pr_number: u64,
        author: String,
        draft: bool,
    },
    /// Review submitted on a linked pull request
    PrReview {
        pr_number: u64,
        reviewer: String,
        verdict: ReviewVerdict,
    },
    /// Comment on a linked pull request
    PrComment {
        pr_number: u64,
        actor: String,
    },
    /// Linked pull request was merged
    PrMerged {
        pr_number: u64,
    },
    /// Linked pull request was closed without merging
    PrClosed {
        pr_number: u64,
    },
    /// Draft flag flipped on a linked pull request
    DraftToggled {
        pr_number: u64,
        draft: bool,
    },
    /// Commit pushed to a linked pull request
    Commit {
        pr_number: u64,
        author: String,
    },
}

impl EventPayload {
    /// Pull request this payload refers to, if any
    pub fn pr_number(&self) -> Option<u64> {
        match self {
            EventPayload::StatusChange { pr_number, .. } => *pr_number,
            EventPayload::PrOpened { pr_number, .. }
            | EventPayload::PrReview { pr_number, .. }
            | EventPayload::PrComment { pr_number, .. }
            | EventPayload::PrMerged { pr_number }
            | EventPayload::PrClosed { pr_number }
            | EventPayload::DraftToggled { pr_number, .. }
            | EventPayload::Commit { pr_number, .. } => Some(*pr_number),
            EventPayload::Created
            | EventPayload::CategoryChange { .. }
            | EventPayload::DeadlineChange { .. } => None,
        }
    }
}

/// A single immutable fact about one proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalEvent {
    /// Insertion sequence number assigned by the store; breaks timestamp ties
    pub id: u64,
    pub proposal_number: u32,
    pub repo: Repo,
    /// Authoritative ordering key
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl ProposalEvent {
    /// Ordering key: chronological, insertion id breaks ties
    pub fn sort_key(&self) -> (DateTime<Utc>, u64) {
        (self.occurred_at, self.id)
    }
}

/// An event as submitted by the upstream log, before the store assigns an id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub proposal_number: u32,
    pub repo: Repo,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
}
