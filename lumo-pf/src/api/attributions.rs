//! Attribution retrieval and export endpoints
//!
//! `GET /api/attributions` — list stored attributions, optionally
//! filtered to one project directory.
//! `POST /api/attributions/export` — write the HTML report and/or the
//! React component file.

use crate::models::Attribution;
use crate::services::{save_attribution_html, save_react_component};
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Query parameters for the attribution listing
#[derive(Debug, Deserialize)]
pub struct ListAttributionsQuery {
    /// Project directory; only attributions saved under it are returned
    pub project: Option<String>,
}

/// Response payload for the attribution listing
#[derive(Debug, Serialize)]
pub struct ListAttributionsResponse {
    pub count: usize,
    pub attributions: Vec<Attribution>,
}

/// GET /api/attributions handler
///
/// An empty ledger is a "0 found" result, not an error.
pub async fn list_attributions(
    State(state): State<AppState>,
    Query(params): Query<ListAttributionsQuery>,
) -> ApiResult<Json<ListAttributionsResponse>> {
    let ledger = state.ledger.lock().await;

    let attributions = match params.project.as_deref() {
        Some(project) => ledger.attributions_for_project(Path::new(project)),
        None => ledger.all_attributions(),
    };

    Ok(Json(ListAttributionsResponse {
        count: attributions.len(),
        attributions,
    }))
}

/// Request payload for attribution export
#[derive(Debug, Deserialize)]
pub struct ExportAttributionsRequest {
    /// Where to write the HTML report
    pub html_path: Option<String>,
    /// Where to write the React component source file
    pub react_path: Option<String>,
}

/// Response payload for attribution export
#[derive(Debug, Serialize)]
pub struct ExportAttributionsResponse {
    /// Whether the HTML report was written (absent if not requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_written: Option<bool>,
    /// Whether the React component was written (absent if not requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub react_written: Option<bool>,
}

/// POST /api/attributions/export handler
///
/// Each requested file is written best-effort; a failed write reports
/// `false` rather than failing the request.
pub async fn export_attributions(
    State(state): State<AppState>,
    Json(payload): Json<ExportAttributionsRequest>,
) -> ApiResult<Json<ExportAttributionsResponse>> {
    if payload.html_path.is_none() && payload.react_path.is_none() {
        return Err(ApiError::BadRequest(
            "provide html_path and/or react_path".to_string(),
        ));
    }

    let ledger = state.ledger.lock().await;

    let html_written = payload
        .html_path
        .as_deref()
        .map(|path| save_attribution_html(Path::new(path), &ledger.all_attributions()));

    let react_written = payload
        .react_path
        .as_deref()
        .map(|path| save_react_component(Path::new(path), ledger.database()));

    Ok(Json(ExportAttributionsResponse {
        html_written,
        react_written,
    }))
}

/// Build attribution routes
pub fn attribution_routes() -> Router<AppState> {
    Router::new()
        .route("/api/attributions", get(list_attributions))
        .route("/api/attributions/export", post(export_attributions))
}
