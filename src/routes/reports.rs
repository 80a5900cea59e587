//! Reporting API routes

use crate::error::AppError;
use crate::events::Repo;
use crate::reports::{lifecycle_funnel, monthly_status_snapshot, LifecycleFunnel, MonthlySnapshot};
use crate::state::SharedState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

// ==================== Request/Response Types ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyQuery {
    /// Defaults to the current calendar year
    pub year: Option<i32>,
    pub repo: Option<Repo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyResponse {
    pub success: bool,
    pub year: i32,
    pub months: Vec<MonthlySnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelQuery {
    pub year: Option<i32>,
    pub repo: Option<Repo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub funnel: LifecycleFunnel,
}

// ==================== Handlers ====================

/// Proposals entering each status, per month of one year
pub async fn get_monthly_report(
    State(state): State<SharedState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyResponse>, AppError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let events = state.events.all_events(query.repo).await;
    let months = monthly_status_snapshot(&events, year);

    Ok(Json(MonthlyResponse {
        success: true,
        year,
        months,
    }))
}

/// Opened -> reviewed -> merged/closed-unmerged funnel
pub async fn get_funnel_report(
    State(state): State<SharedState>,
    Query(query): Query<FunnelQuery>,
) -> Result<Json<FunnelResponse>, AppError> {
    let events = state.events.all_events(query.repo).await;
    let funnel = lifecycle_funnel(&events, query.year);

    Ok(Json(FunnelResponse {
        success: true,
        year: query.year,
        funnel,
    }))
}
