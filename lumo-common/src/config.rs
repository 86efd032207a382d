//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents
///
/// Lives at the platform config path (`~/.config/lumo/config.toml` on
/// Linux). All fields are optional; missing values fall back to
/// environment variables or compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root data folder (ledger database and default download target)
    pub root_folder: Option<String>,
    /// Unsplash API access key
    pub unsplash_access_key: Option<String>,
    /// Default directory for downloaded images
    pub download_dir: Option<String>,
    /// HTTP listen port
    pub port: Option<u16>,
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Load the TOML configuration file from the platform config path
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    load_toml_config_from(&path)
}

/// Load a TOML configuration file from an explicit path
pub fn load_toml_config_from(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Write a TOML configuration file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    Ok(())
}

/// Get default configuration file path for the platform
pub fn config_file_path() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/lumo/config.toml first, then /etc/lumo/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("lumo").join("config.toml"));
        let system_config = PathBuf::from("/etc/lumo/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else if cfg!(any(target_os = "macos", target_os = "windows")) {
        let path = dirs::config_dir()
            .map(|d| d.join("lumo").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )))
        }
    } else {
        Err(Error::Config("Unsupported platform".to_string()))
    }
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/lumo (or /var/lib/lumo for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("lumo"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/lumo"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/lumo
        dirs::data_dir()
            .map(|d| d.join("lumo"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/lumo"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\lumo
        dirs::data_local_dir()
            .map(|d| d.join("lumo"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\lumo"))
    } else {
        PathBuf::from("./lumo_data")
    }
}

/// Create the root folder directory if missing
pub fn ensure_root_folder(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::info!("Creating root folder: {}", path.display());
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
