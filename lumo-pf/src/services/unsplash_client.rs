//! Unsplash API client
//!
//! All network interaction with the upstream photo service: search,
//! get-by-id, download tracking and streamed file download, with
//! retry/backoff resilience and per-hour rate-limit bookkeeping.
//!
//! One client instance is constructed per logical session and passed to
//! consumers; rate-limit counters are fields of the instance, not
//! process-wide state.

use crate::models::{Photo, SearchResults, TrackDownload};
use crate::utils::{retry_request, RetryClass, RetryPolicy};
use crate::validators;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const UNSPLASH_API_BASE_URL: &str = "https://api.unsplash.com";
const USER_AGENT: &str = "lumo-pf/0.1.0 (https://github.com/lumo/lumo)";
/// Fixed upstream API version header value
const API_VERSION: &str = "v1";
/// Upstream quota window, in seconds
const QUOTA_WINDOW_SECS: i64 = 3600;

/// Unsplash client errors
#[derive(Debug, Error)]
pub enum UnsplashError {
    /// Client construction or other non-transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response that is not 429 or 5xx; never retried
    #[error("Upstream client error {status}: {body}")]
    ClientError { status: u16, body: String },

    /// 404 on a photo lookup
    #[error("Photo not found: {0}")]
    PhotoNotFound(String),

    /// 429 from the upstream; handled as a wait, not a failure
    #[error("Rate limited by upstream")]
    RateLimited { retry_after: Option<Duration> },

    /// 5xx or network-reset class failure; retried up to the budget
    #[error("Transient upstream error: {0}")]
    Transient(String),

    /// 2xx body that does not satisfy the expected shape; never retried
    #[error("Response validation failed: {0}")]
    Validation(String),

    /// Filesystem or byte-stream failure while saving an image
    #[error("Download failed: {0}")]
    Download(String),
}

impl UnsplashError {
    /// How the retry loop handles this error
    pub fn retry_class(&self) -> RetryClass {
        match self {
            UnsplashError::RateLimited { retry_after } => RetryClass::RateLimited(*retry_after),
            UnsplashError::Transient(_) => RetryClass::Transient,
            _ => RetryClass::Fatal,
        }
    }
}

/// Snapshot of upstream quota bookkeeping
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitStatus {
    /// Remaining requests in the current window, from the last response
    pub remaining: Option<u32>,
    /// When the window is assumed to reset (last response + 1 hour)
    pub reset_at: Option<DateTime<Utc>>,
}

/// Outcome of the best-effort download-tracking call
#[derive(Debug, Clone, Copy)]
pub struct TrackOutcome {
    pub success: bool,
}

/// Unsplash API client
pub struct UnsplashClient {
    http_client: reqwest::Client,
    access_key: String,
    base_url: String,
    retry_policy: RetryPolicy,
    rate_limit: Mutex<RateLimitStatus>,
}

impl UnsplashClient {
    pub fn new(access_key: String) -> Result<Self, UnsplashError> {
        Self::with_base_url(access_key, UNSPLASH_API_BASE_URL.to_string())
    }

    /// Construct against a non-default origin (used by tests)
    pub fn with_base_url(access_key: String, base_url: String) -> Result<Self, UnsplashError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| UnsplashError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_policy: RetryPolicy::default(),
            rate_limit: Mutex::new(RateLimitStatus::default()),
        })
    }

    /// Replace the retry schedule (tests use millisecond delays)
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Current quota bookkeeping, for callers and observability
    pub async fn rate_limit_status(&self) -> RateLimitStatus {
        *self.rate_limit.lock().await
    }

    /// Search photos by query
    pub async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchResults, UnsplashError> {
        // Upstream caps page size at 30
        let per_page = per_page.clamp(1, 30);
        let page = page.max(1);
        let url = format!("{}/search/photos", self.base_url);
        let params = [
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];

        tracing::debug!(query, page, per_page, "Searching upstream photos");

        let response = retry_request("search_photos", &self.retry_policy, || {
            self.send_get(&url, &params)
        })
        .await?;

        let results: SearchResults = Self::decode_json(response).await?;
        validators::validate_search_results(&results, per_page)
            .map_err(|issue| UnsplashError::Validation(issue.to_string()))?;

        tracing::info!(
            query,
            total = results.total,
            returned = results.results.len(),
            "Photo search complete"
        );

        Ok(results)
    }

    /// Fetch one photo record by id
    pub async fn get_photo(&self, id: &str) -> Result<Photo, UnsplashError> {
        let url = format!("{}/photos/{}", self.base_url, id);

        tracing::debug!(photo_id = id, "Fetching photo by id");

        let response = retry_request("get_photo", &self.retry_policy, || self.send_get(&url, &[]))
            .await
            .map_err(|err| map_not_found(err, id))?;

        let photo: Photo = Self::decode_json(response).await?;
        validators::validate_photo(&photo)
            .map_err(|issue| UnsplashError::Validation(issue.to_string()))?;

        Ok(photo)
    }

    /// Report a download to the upstream accounting endpoint.
    ///
    /// Required by the upstream terms before serving a downloaded file,
    /// but best-effort by design: the error channel of the inner call is
    /// discarded here and logged, so tracking can never block delivery.
    pub async fn track_download(&self, photo_id: &str) -> TrackOutcome {
        match self.track_download_inner(photo_id).await {
            Ok(track) => {
                tracing::debug!(
                    photo_id,
                    url = track.url.as_deref().unwrap_or(""),
                    "Download tracked upstream"
                );
                TrackOutcome { success: true }
            }
            Err(err) => {
                tracing::warn!(
                    photo_id,
                    error = %err,
                    "Download tracking failed, proceeding without it"
                );
                TrackOutcome { success: false }
            }
        }
    }

    /// Single-attempt tracking call; no retry so a degraded upstream
    /// cannot stall the download that follows.
    async fn track_download_inner(&self, photo_id: &str) -> Result<TrackDownload, UnsplashError> {
        let url = format!("{}/photos/{}/download", self.base_url, photo_id);
        let response = self.send_get(&url, &[]).await?;

        // The tracking endpoint may answer with an empty body; that is a
        // valid empty result, not a validation failure.
        if response.status() == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Ok(TrackDownload::default());
        }

        let track: TrackDownload = Self::decode_json(response).await?;
        validators::validate_track_download(&track)
            .map_err(|issue| UnsplashError::Validation(issue.to_string()))?;

        Ok(track)
    }

    /// Download a photo's bytes to `{target_dir}/{filename}.jpg`,
    /// returning the absolute path of the written file.
    ///
    /// The target directory is created recursively; the upstream
    /// accounting call runs first; the byte stream is piped to disk
    /// chunk by chunk and fully flushed before this resolves.
    pub async fn download_photo(
        &self,
        photo: &Photo,
        target_dir: &Path,
        filename_override: Option<&str>,
        url_override: Option<&str>,
    ) -> Result<PathBuf, UnsplashError> {
        tokio::fs::create_dir_all(target_dir).await.map_err(|e| {
            UnsplashError::Download(format!(
                "cannot create {}: {}",
                target_dir.display(),
                e
            ))
        })?;

        let tracked = self.track_download(&photo.id).await;

        let url = url_override.unwrap_or(&photo.urls.full);
        let filename = download_filename(&photo.id, filename_override);
        let path = target_dir.join(&filename);

        tracing::info!(
            photo_id = %photo.id,
            url,
            path = %path.display(),
            tracked = tracked.success,
            "Downloading photo"
        );

        let response = retry_request("download_photo", &self.retry_policy, || {
            self.send_get(url, &[])
        })
        .await
        .map_err(|err| match err {
            UnsplashError::Download(_) => err,
            other => UnsplashError::Download(other.to_string()),
        })?;

        let mut stream = response.bytes_stream();
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| UnsplashError::Download(format!("cannot create {}: {}", path.display(), e)))?;

        let mut bytes_written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| UnsplashError::Download(format!("stream read: {}", e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| UnsplashError::Download(format!("write {}: {}", path.display(), e)))?;
            bytes_written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| UnsplashError::Download(format!("flush {}: {}", path.display(), e)))?;
        file.sync_all()
            .await
            .map_err(|e| UnsplashError::Download(format!("sync {}: {}", path.display(), e)))?;

        tracing::info!(
            photo_id = %photo.id,
            bytes = bytes_written,
            path = %path.display(),
            "Photo saved"
        );

        let absolute = tokio::fs::canonicalize(&path).await.unwrap_or(path);
        Ok(absolute)
    }

    /// One GET attempt with auth and version headers; classifies the
    /// response status and records rate-limit headers.
    async fn send_get(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, UnsplashError> {
        let mut request = self
            .http_client
            .get(url)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", API_VERSION);

        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UnsplashError::Transient(e.to_string()))?;

        self.record_rate_limit(&response).await;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UnsplashError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }

        if status.is_server_error() {
            return Err(UnsplashError::Transient(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await.unwrap_or_default();
        Err(UnsplashError::ClientError {
            status: status.as_u16(),
            body,
        })
    }

    /// Store the remaining-quota header and a reset time of now + 1 hour
    async fn record_rate_limit(&self, response: &reqwest::Response) {
        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u32>().ok());

        if let Some(remaining) = remaining {
            let mut status = self.rate_limit.lock().await;
            status.remaining = Some(remaining);
            status.reset_at = Some(Utc::now() + chrono::Duration::seconds(QUOTA_WINDOW_SECS));
        }
    }

    /// Decode a 2xx body as JSON. A malformed-but-200 body is a contract
    /// violation, surfaced as a validation failure and never retried.
    async fn decode_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, UnsplashError> {
        response
            .json::<T>()
            .await
            .map_err(|e| UnsplashError::Validation(format!("JSON decode failed: {}", e)))
    }
}

/// Map a 404 from a photo lookup to the dedicated not-found error
fn map_not_found(err: UnsplashError, id: &str) -> UnsplashError {
    match err {
        UnsplashError::ClientError { status: 404, .. } => {
            UnsplashError::PhotoNotFound(id.to_string())
        }
        other => other,
    }
}

/// File name for a saved photo: `{override or "unsplash-{id}"}.jpg`
fn download_filename(photo_id: &str, filename_override: Option<&str>) -> String {
    match filename_override {
        Some(stem) if !stem.trim().is_empty() => format!("{}.jpg", stem.trim()),
        _ => format!("unsplash-{}.jpg", photo_id),
    }
}

/// Image variant URL with resize/crop query parameters appended
pub fn resized_url(base: &str, width: Option<u32>, height: Option<u32>) -> String {
    if width.is_none() && height.is_none() {
        return base.to_string();
    }

    let mut url = match url::Url::parse(base) {
        Ok(url) => url,
        Err(_) => return base.to_string(),
    };

    {
        let mut pairs = url.query_pairs_mut();
        if let Some(w) = width {
            pairs.append_pair("w", &w.to_string());
        }
        if let Some(h) = height {
            pairs.append_pair("h", &h.to_string());
        }
        if width.is_some() && height.is_some() {
            pairs.append_pair("fit", "crop");
        }
    }

    url.to_string()
}

/// Seconds-valued `Retry-After` header, if present and parsable
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
