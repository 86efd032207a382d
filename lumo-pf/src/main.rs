//! lumo-pf - Photo Fetch Service
//!
//! Tool server wrapping the Unsplash photo API: searches and downloads
//! stock photos, and maintains a persistent attribution ledger for
//! license compliance.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lumo_pf::services::{AttributionLedger, UnsplashClient};
use lumo_pf::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting lumo-pf (Photo Fetch) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve and initialize the root folder
    let root_folder = lumo_common::config::resolve_root_folder(None, "LUMO_ROOT_FOLDER");
    lumo_common::config::ensure_root_folder(&root_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;
    info!("Root folder: {}", root_folder.display());

    // Step 2: Resolve service configuration (access key, directories, port)
    let toml_config = lumo_common::config::load_toml_config().unwrap_or_default();
    let config = lumo_pf::config::ServiceConfig::resolve(&root_folder, &toml_config)?;
    info!("Download directory: {}", config.download_dir.display());

    // Step 3: Construct the upstream client and open the ledger
    let client = UnsplashClient::new(config.access_key.clone())
        .map_err(|e| anyhow::anyhow!("Failed to create Unsplash client: {}", e))?;

    let ledger = AttributionLedger::new(&config.ledger_dir);
    info!("Attribution ledger: {}", ledger.database_file().display());

    // Create application state
    let state = AppState::new(client, ledger, config.download_dir.clone());

    // Build router
    let app = lumo_pf::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("Listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
