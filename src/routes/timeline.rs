//! Proposal timeline API routes
//!
//! Serves the unified lifecycle narrative plus the raw grouped streams for
//! callers that render them separately.

use crate::error::AppError;
use crate::events::{EventPayload, ProposalEvent, Repo};
use crate::state::SharedState;
use crate::timeline::{merge, UnifiedTimelineEntry};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::collections::BTreeSet;

// ==================== Response Types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub success: bool,
    pub repo: Repo,
    pub proposal_number: u32,
    /// The merged, chronologically ordered narrative
    pub timeline: Vec<UnifiedTimelineEntry>,
    pub creation: Option<ProposalEvent>,
    pub status_events: Vec<ProposalEvent>,
    pub category_events: Vec<ProposalEvent>,
    pub deadline_events: Vec<ProposalEvent>,
    pub pr_events: Vec<ProposalEvent>,
    /// Distinct pull requests referenced by this proposal's events
    pub linked_prs: Vec<u64>,
}

// ==================== Handlers ====================

/// Unified timeline for one proposal
pub async fn get_proposal_timeline(
    State(state): State<SharedState>,
    Path((repo, number)): Path<(Repo, u32)>,
) -> Result<Json<TimelineResponse>, AppError> {
    let events = state.events.events_for_proposal(repo, number).await;
    if events.is_empty() {
        return Err(AppError::NotFound(format!(
            "Proposal {}-{} not found",
            repo, number
        )));
    }

    let mut creation = None;
    let mut status_events = Vec::new();
    let mut category_events = Vec::new();
    let mut deadline_events = Vec::new();
    let mut pr_events = Vec::new();

    for event in events {
        match &event.payload {
            EventPayload::Created => creation = Some(event),
            EventPayload::StatusChange { .. } => status_events.push(event),
            EventPayload::CategoryChange { .. } => category_events.push(event),
            EventPayload::DeadlineChange { .. } => deadline_events.push(event),
            _ => pr_events.push(event),
        }
    }

    let timeline = merge(
        creation.as_ref(),
        &status_events,
        &category_events,
        &deadline_events,
        &pr_events,
    );

    let linked_prs: BTreeSet<u64> = status_events
        .iter()
        .chain(&pr_events)
        .filter_map(|e| e.payload.pr_number())
        .collect();

    Ok(Json(TimelineResponse {
        success: true,
        repo,
        proposal_number: number,
        timeline,
        creation,
        status_events,
        category_events,
        deadline_events,
        pr_events,
        linked_prs: linked_prs.into_iter().collect(),
    }))
}
