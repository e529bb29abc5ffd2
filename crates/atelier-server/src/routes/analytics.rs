//! Analytics ingest.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use atelier_core::analytics::{AnalyticsEvent, BatcherStats};

use crate::error::{ApiJson, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub events: Vec<AnalyticsEvent>,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub accepted: usize,
}

/// `POST /api/analytics`
///
/// Queues the events for the background flush worker. The whole submission
/// is rejected if any event is invalid.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), AppError> {
    let accepted = state.batcher.submit(body.events).await?;
    tracing::debug!(accepted, "analytics events queued");
    Ok((StatusCode::ACCEPTED, Json(IngestResponse { accepted })))
}

/// `GET /api/analytics/stats`
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<BatcherStats> {
    Json(state.batcher.stats().await)
}
