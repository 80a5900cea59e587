//! Event ingestion API routes
//!
//! Accepts batches from the upstream event log so the in-process snapshot
//! can track it between full reloads.

use crate::error::AppError;
use crate::events::NewEvent;
use crate::state::SharedState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ==================== Request/Response Types ====================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    #[validate(length(min = 1, message = "Event batch must contain at least one event"))]
    pub events: Vec<NewEvent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    /// Receipt for correlating this append with the upstream log
    pub batch_id: Uuid,
    pub accepted: usize,
    pub first_id: u64,
    pub last_id: u64,
}

// ==================== Handlers ====================

/// Append a batch of upstream events to the snapshot
pub async fn ingest_events(
    State(state): State<SharedState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    request.validate()?;

    let accepted = request.events.len();
    let batch_id = Uuid::new_v4();
    let (first_id, last_id) = state.events.append(request.events).await?;

    tracing::info!(
        "Ingested batch {} with {} event(s) from upstream log (ids {}..={})",
        batch_id,
        accepted,
        first_id,
        last_id
    );

    Ok(Json(IngestResponse {
        success: true,
        message: format!("{} event(s) accepted", accepted),
        batch_id,
        accepted,
        first_id,
        last_id,
    }))
}
