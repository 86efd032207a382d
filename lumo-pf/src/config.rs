//! Configuration resolution for lumo-pf
//!
//! Service-level settings resolved with ENV → TOML priority on top of
//! the shared root-folder resolution in `lumo_common::config`.

use lumo_common::config::TomlConfig;
use lumo_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5731;

/// Environment variable holding the Unsplash access key
pub const ACCESS_KEY_ENV: &str = "LUMO_UNSPLASH_ACCESS_KEY";

/// Environment variable overriding the default download directory
pub const DOWNLOAD_DIR_ENV: &str = "LUMO_DOWNLOAD_DIR";

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upstream API access key
    pub access_key: String,
    /// Default directory for downloaded images
    pub download_dir: PathBuf,
    /// Directory holding the attribution database file
    pub ledger_dir: PathBuf,
    /// HTTP listen port
    pub port: u16,
}

impl ServiceConfig {
    /// Resolve all service settings from the environment and TOML
    /// config, anchored at the root folder.
    pub fn resolve(root_folder: &Path, toml_config: &TomlConfig) -> Result<Self> {
        let access_key = resolve_access_key(toml_config)?;

        let download_dir = std::env::var(DOWNLOAD_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| toml_config.download_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| root_folder.join("downloads"));

        Ok(Self {
            access_key,
            download_dir,
            ledger_dir: root_folder.to_path_buf(),
            port: toml_config.port.unwrap_or(DEFAULT_PORT),
        })
    }
}

/// Resolve the Unsplash access key from 2-tier configuration
///
/// **Priority:** ENV → TOML
pub fn resolve_access_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(ACCESS_KEY_ENV).ok();
    let toml_key = toml_config.unsplash_access_key.as_ref();

    let mut sources = Vec::new();
    if env_key.as_deref().is_some_and(is_valid_key) {
        sources.push("environment");
    }
    if toml_key.map(|k| is_valid_key(k)).unwrap_or(false) {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Unsplash access key found in multiple sources: {}. Using environment (highest priority).",
            sources.join(", ")
        );
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("Unsplash access key loaded from environment variable");
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(key) {
            info!("Unsplash access key loaded from TOML config");
            return Ok(key.clone());
        }
    }

    Err(Error::Config(
        "Unsplash access key not configured. Please configure using one of:\n\
         1. Environment: LUMO_UNSPLASH_ACCESS_KEY=your-key-here\n\
         2. TOML config: ~/.config/lumo/config.toml (unsplash_access_key = \"your-key\")\n\
         \n\
         Obtain an access key at: https://unsplash.com/developers"
            .to_string(),
    ))
}

/// Validate an access key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
