//! Photo fetch endpoint
//!
//! `POST /api/photos/fetch` — search the upstream service and
//! optionally download a number of results, recording an attribution
//! for each saved file.

use crate::models::{Attribution, Photo};
use crate::services::resized_url;
use crate::{ApiError, ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

/// Request payload for the photo fetch operation
#[derive(Debug, Deserialize)]
pub struct FetchPhotosRequest {
    /// Search query (required, non-empty)
    pub query: String,
    /// Result page, 1-based
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size (upstream caps at 30)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Download matching photos instead of only listing them
    #[serde(default)]
    pub download: bool,
    /// How many results to download (defaults to 1)
    pub count: Option<u32>,
    /// Target directory; defaults to the configured download directory
    pub download_dir: Option<String>,
    /// File name stem; numbered when more than one photo is saved
    pub filename_prefix: Option<String>,
    /// Optional resize width applied to the image URL
    pub width: Option<u32>,
    /// Optional resize height applied to the image URL
    pub height: Option<u32>,
}

/// One search result in the response
#[derive(Debug, Serialize)]
pub struct PhotoSummary {
    pub id: String,
    pub description: Option<String>,
    pub width: u32,
    pub height: u32,
    pub photographer: String,
    pub photographer_url: String,
    pub page_url: String,
    pub thumb_url: String,
}

impl From<&Photo> for PhotoSummary {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id.clone(),
            description: photo.display_description().map(String::from),
            width: photo.width,
            height: photo.height,
            photographer: photo.user.display_name().to_string(),
            photographer_url: photo.user.profile_url(),
            page_url: photo.links.html.clone(),
            thumb_url: photo.urls.thumb.clone(),
        }
    }
}

/// One completed download in the response
#[derive(Debug, Serialize)]
pub struct DownloadOutcome {
    pub id: String,
    pub file_path: String,
    pub attribution: Attribution,
}

/// Response payload for the photo fetch operation
#[derive(Debug, Serialize)]
pub struct FetchPhotosResponse {
    pub query: String,
    /// Total match count upstream, across all pages
    pub total: u64,
    pub total_pages: u64,
    pub photos: Vec<PhotoSummary>,
    /// Downloads completed by this request, in selection order
    pub downloads: Vec<DownloadOutcome>,
    /// Set when the query matched nothing (a result, not an error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/photos/fetch handler
///
/// Photos are downloaded strictly one at a time; the attribution for
/// photo N is committed before photo N+1 starts, and response order
/// matches selection order. A mid-batch failure ends the request with
/// that error; attributions already committed are kept.
pub async fn fetch_photos(
    State(state): State<AppState>,
    Json(payload): Json<FetchPhotosRequest>,
) -> ApiResult<Json<FetchPhotosResponse>> {
    match fetch_photos_inner(&state, payload).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            *state.last_error.write().await = Some(err.to_string());
            Err(err)
        }
    }
}

async fn fetch_photos_inner(
    state: &AppState,
    payload: FetchPhotosRequest,
) -> ApiResult<FetchPhotosResponse> {
    if payload.query.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "query cannot be empty or whitespace-only".to_string(),
        ));
    }

    let results = state
        .client
        .search_photos(&payload.query, payload.page, payload.per_page)
        .await?;

    let photos: Vec<PhotoSummary> = results.results.iter().map(PhotoSummary::from).collect();

    let mut downloads = Vec::new();
    if payload.download && !results.results.is_empty() {
        let target_dir = payload
            .download_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| state.download_dir.clone());
        let count = payload.count.unwrap_or(1) as usize;
        let selected = &results.results[..count.min(results.results.len())];

        for (index, photo) in selected.iter().enumerate() {
            let image_url = (payload.width.is_some() || payload.height.is_some())
                .then(|| resized_url(&photo.urls.full, payload.width, payload.height));

            let filename = payload.filename_prefix.as_ref().map(|prefix| {
                if selected.len() > 1 {
                    format!("{}-{}", prefix, index + 1)
                } else {
                    prefix.clone()
                }
            });

            let file_path = state
                .client
                .download_photo(photo, &target_dir, filename.as_deref(), image_url.as_deref())
                .await?;

            let attribution = state.ledger.lock().await.add_attribution(photo, &file_path);

            downloads.push(DownloadOutcome {
                id: photo.id.clone(),
                file_path: file_path.to_string_lossy().into_owned(),
                attribution,
            });
        }

        info!(
            query = %payload.query,
            downloaded = downloads.len(),
            dir = %target_dir.display(),
            "Photo fetch complete"
        );
    }

    let message = results
        .results
        .is_empty()
        .then(|| format!("No photos found for query \"{}\"", payload.query));

    Ok(FetchPhotosResponse {
        query: payload.query,
        total: results.total,
        total_pages: results.total_pages,
        photos,
        downloads,
        message,
    })
}

/// Build photo routes
pub fn photo_routes() -> Router<AppState> {
    Router::new().route("/api/photos/fetch", post(fetch_photos))
}
