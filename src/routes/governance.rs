//! Governance API routes
//!
//! Exposes per-PR governance classification and the waiting-time buckets.

use crate::error::AppError;
use crate::events::Repo;
use crate::governance::{classify_full, waiting_buckets, GovernanceState, WaitingBucket};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Request/Response Types ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceQuery {
    /// Classification time; defaults to now
    pub as_of: Option<DateTime<Utc>>,
    /// When true, NO_STATE from missing metadata becomes a 422 instead of
    /// a degraded answer
    pub strict: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceResponse {
    pub success: bool,
    pub repo: Repo,
    pub pr_number: u64,
    pub state: GovernanceState,
    pub as_of: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketsQuery {
    pub repo: Option<Repo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketsResponse {
    pub success: bool,
    pub as_of: DateTime<Utc>,
    pub buckets: Vec<WaitingBucket>,
}

// ==================== Handlers ====================

/// Governance state of one pull request
pub async fn get_governance_state(
    State(state): State<SharedState>,
    Path((repo, pr_number)): Path<(Repo, u64)>,
    Query(query): Query<GovernanceQuery>,
) -> Result<Json<GovernanceResponse>, AppError> {
    let events = state.events.events_for_pr(repo, pr_number).await;
    if events.is_empty() {
        return Err(AppError::NotFound(format!(
            "PR #{} not found in {}",
            pr_number, repo
        )));
    }

    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let roles = state.roles.snapshot().await;
    let classification = classify_full(
        &events,
        &roles,
        as_of,
        state.settings.governance.stall_threshold(),
    );

    if query.strict.unwrap_or(false) && classification.state == GovernanceState::NoState {
        return Err(AppError::IncompleteData(format!(
            "PR #{} cannot be classified: actor roles unresolved",
            pr_number
        )));
    }

    Ok(Json(GovernanceResponse {
        success: true,
        repo,
        pr_number,
        state: classification.state,
        as_of,
        waiting_since: classification.waiting_since,
        wait_days: classification
            .waiting_since
            .map(|since| (as_of - since).num_days()),
    }))
}

/// Waiting-time buckets over all known open PRs
pub async fn get_waiting_buckets(
    State(state): State<SharedState>,
    Query(query): Query<BucketsQuery>,
) -> Result<Json<BucketsResponse>, AppError> {
    let as_of = Utc::now();
    let buckets = waiting_buckets(
        &state.events,
        &state.roles,
        &state.settings.governance,
        query.repo,
        as_of,
    )
    .await;

    Ok(Json(BucketsResponse {
        success: true,
        as_of,
        buckets,
    }))
}
