//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (e.g. "ok")
    pub status: String,
    /// Module name ("lumo-pf")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Remaining upstream quota, from the last response seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_remaining: Option<u32>,
    /// Assumed upstream quota reset time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset_at: Option<String>,
    /// Last error message if any (for diagnostics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
///
/// Health check endpoint for monitoring. Includes the client's
/// rate-limit bookkeeping for observability.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let rate_limit = state.client.rate_limit_status().await;
    let last_error = state.last_error.read().await.clone();

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "lumo-pf".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        rate_limit_remaining: rate_limit.remaining,
        rate_limit_reset_at: rate_limit.reset_at.map(|t| t.to_rfc3339()),
        last_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
