//! Event log snapshot
//!
//! In-memory append-only snapshot of the upstream event log, with the typed
//! reader queries the derived views are built on. Persistence and indexing
//! of the authoritative log belong to the upstream collaborator; this store
//! only mirrors it for query serving.

use crate::error::AppError;
use crate::events::{EventPayload, NewEvent, ProposalEvent, Repo};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe snapshot of the proposal event log
#[derive(Clone)]
pub struct EventStore {
    inner: Arc<RwLock<EventLog>>,
}

#[derive(Default)]
struct EventLog {
    events: Vec<ProposalEvent>,
    next_id: u64,
}

impl EventLog {
    fn push(&mut self, event: NewEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.events.push(ProposalEvent {
            id,
            proposal_number: event.proposal_number,
            repo: event.repo,
            occurred_at: event.occurred_at,
            payload: event.payload,
        });
        id
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(EventLog::default())),
        }
    }

    /// Build a store from a JSON export of the upstream event log.
    ///
    /// The export is an array of events without ids; ids are assigned in
    /// file order, which is the upstream log's insertion order.
    pub fn from_snapshot(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Upstream(format!("event log snapshot {} unreachable: {}", path.display(), e))
        })?;
        let batch: Vec<NewEvent> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Upstream(format!("event log snapshot {} unreadable: {}", path.display(), e))
        })?;

        let mut log = EventLog::default();
        for event in batch {
            log.push(event);
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(log)),
        })
    }

    /// Append a batch of events from the upstream log.
    ///
    /// Returns the first and last assigned ids.
    pub async fn append(&self, batch: Vec<NewEvent>) -> Result<(u64, u64), AppError> {
        if batch.is_empty() {
            return Err(AppError::Validation("event batch must not be empty".to_string()));
        }
        let mut log = self.inner.write().await;
        let first = log.next_id;
        let mut last = first;
        for event in batch {
            last = log.push(event);
        }
        Ok((first, last))
    }

    /// All events for one proposal, ordered by (occurred_at, id)
    pub async fn events_for_proposal(&self, repo: Repo, number: u32) -> Vec<ProposalEvent> {
        let log = self.inner.read().await;
        let mut out: Vec<ProposalEvent> = log
            .events
            .iter()
            .filter(|e| e.repo == repo && e.proposal_number == number)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.sort_key());
        out
    }

    /// All events referencing one pull request, ordered by (occurred_at, id)
    pub async fn events_for_pr(&self, repo: Repo, pr_number: u64) -> Vec<ProposalEvent> {
        let log = self.inner.read().await;
        let mut out: Vec<ProposalEvent> = log
            .events
            .iter()
            .filter(|e| e.repo == repo && e.payload.pr_number() == Some(pr_number))
            .cloned()
            .collect();
        out.sort_by_key(|e| e.sort_key());
        out
    }

    /// All events in the closed activity window `[since, until]`
    /// (start inclusive, nothing after `until`)
    pub async fn events_in_window(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Vec<ProposalEvent> {
        let log = self.inner.read().await;
        let mut out: Vec<ProposalEvent> = log
            .events
            .iter()
            .filter(|e| e.occurred_at >= since && e.occurred_at <= until)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.sort_key());
        out
    }

    /// Every event in the log, optionally filtered by repo
    pub async fn all_events(&self, repo: Option<Repo>) -> Vec<ProposalEvent> {
        let log = self.inner.read().await;
        let mut out: Vec<ProposalEvent> = log
            .events
            .iter()
            .filter(|e| repo.map_or(true, |r| e.repo == r))
            .cloned()
            .collect();
        out.sort_by_key(|e| e.sort_key());
        out
    }

    /// Distinct pull requests that have an opened event, optionally by repo
    pub async fn known_prs(&self, repo: Option<Repo>) -> Vec<(Repo, u64)> {
        let log = self.inner.read().await;
        let set: BTreeSet<(Repo, u64)> = log
            .events
            .iter()
            .filter(|e| repo.map_or(true, |r| e.repo == r))
            .filter_map(|e| match &e.payload {
                EventPayload::PrOpened { pr_number, .. } => Some((e.repo, *pr_number)),
                _ => None,
            })
            .collect();
        set.into_iter().collect()
    }

    /// Whether any event references the given pull request
    pub async fn pr_exists(&self, repo: Repo, pr_number: u64) -> bool {
        let log = self.inner.read().await;
        log.events
            .iter()
            .any(|e| e.repo == repo && e.payload.pr_number() == Some(pr_number))
    }

    /// Event count in the snapshot
    pub async fn count(&self) -> usize {
        let log = self.inner.read().await;
        log.events.len()
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Status;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn status_event(day: u32, to: Status) -> NewEvent {
        NewEvent {
            proposal_number: 4844,
            repo: Repo::Eip,
            occurred_at: at(day),
            payload: EventPayload::StatusChange {
                from: None,
                to,
                pr_number: None,
            },
        }
    }

    #[tokio::test]
    async fn append_assigns_monotonic_ids() {
        let store = EventStore::new();
        let (first, last) = store
            .append(vec![status_event(1, Status::Draft), status_event(2, Status::Review)])
            .await
            .unwrap();
        assert_eq!(first, 0);
        assert_eq!(last, 1);

        let (first, last) = store.append(vec![status_event(3, Status::Final)]).await.unwrap();
        assert_eq!(first, 2);
        assert_eq!(last, 2);
        assert_eq!(store.count().await, 3);
    }

    #[tokio::test]
    async fn append_rejects_empty_batch() {
        let store = EventStore::new();
        let err = store.append(Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn proposal_query_orders_by_time_then_id() {
        let store = EventStore::new();
        // Same timestamp on purpose: insertion order must break the tie.
        let mut tied = status_event(5, Status::Review);
        tied.occurred_at = at(1);
        store
            .append(vec![status_event(1, Status::Draft), tied])
            .await
            .unwrap();

        let events = store.events_for_proposal(Repo::Eip, 4844).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, 0);
        assert_eq!(events[1].id, 1);
    }

    #[tokio::test]
    async fn window_query_is_start_inclusive() {
        let store = EventStore::new();
        store
            .append(vec![
                status_event(1, Status::Draft),
                status_event(8, Status::Review),
                status_event(15, Status::Final),
            ])
            .await
            .unwrap();

        let window = store.events_in_window(at(8), at(14)).await;
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].occurred_at, at(8));
    }
}
