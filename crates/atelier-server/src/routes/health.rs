//! Health check endpoint.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    uptime_secs: i64,
    analytics_queued: usize,
    contact_enquiries: u64,
}

/// Public health check endpoint.
///
/// Returns basic service health for load balancer probes.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.batcher.stats().await;
    Json(HealthResponse {
        status: "ok",
        service: "atelier",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        analytics_queued: stats.queued,
        contact_enquiries: state.contact_enquiries.load(Ordering::Relaxed),
    })
}
