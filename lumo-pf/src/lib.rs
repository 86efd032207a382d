//! lumo-pf library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod validators;

pub use crate::error::{ApiError, ApiResult};

use crate::services::{AttributionLedger, UnsplashClient};
use axum::Router;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream API client; one instance per process, passed explicitly
    pub client: Arc<UnsplashClient>,
    /// Attribution ledger; requests serialize on the lock
    pub ledger: Arc<Mutex<AttributionLedger>>,
    /// Default target directory for downloads
    pub download_dir: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(client: UnsplashClient, ledger: AttributionLedger, download_dir: PathBuf) -> Self {
        Self {
            client: Arc::new(client),
            ledger: Arc::new(Mutex::new(ledger)),
            download_dir,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::photo_routes())
        .merge(api::attribution_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
