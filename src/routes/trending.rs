//! Trending API routes

use crate::error::AppError;
use crate::state::SharedState;
use crate::trending::{rank_window, TrendingScore};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: usize = 10;

// ==================== Request/Response Types ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQuery {
    pub limit: Option<usize>,
    pub window_days: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponse {
    pub success: bool,
    pub window_days: i64,
    pub window_start: DateTime<Utc>,
    pub trending: Vec<TrendingScore>,
}

// ==================== Handlers ====================

/// Ranked activity over the trailing window
pub async fn get_trending(
    State(state): State<SharedState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<TrendingResponse>, AppError> {
    let window_days = query
        .window_days
        .unwrap_or(state.settings.governance.trending_window_days);
    if window_days < 1 {
        return Err(AppError::Validation(
            "windowDays must be at least 1".to_string(),
        ));
    }
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let until = Utc::now();
    let since = until - Duration::days(window_days);
    let window = state.events.events_in_window(since, until).await;

    let mut trending = rank_window(&window);
    trending.truncate(limit);

    Ok(Json(TrendingResponse {
        success: true,
        window_days,
        window_start: since,
        trending,
    }))
}
