//! Configuration management for s3menu

use crate::error::{Error, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration directory name
const CONFIG_DIR: &str = "s3menu";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the storage service.
///
/// Credentials are never stored here; the SDK default provider chain
/// (environment, shared profile files, instance metadata) supplies them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub force_path_style: bool,
}

/// Interactive menu behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Consecutive invalid choices before the menu is shown again
    #[serde(default = "default_max_invalid_choices")]
    pub max_invalid_choices: usize,
    #[serde(default = "default_true")]
    pub pause_after_action: bool,
    /// Re-list after each mutation and report when the listing disagrees
    #[serde(default = "default_true")]
    pub verify_writes: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            max_invalid_choices: default_max_invalid_choices(),
            pause_after_action: true,
            verify_writes: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_app_name() -> String {
    "Working with S3".to_string()
}

fn default_max_invalid_choices() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let home = home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR))
}

/// Get the configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load configuration from the default location, falling back to defaults
pub fn load_config() -> Result<ConfigFile> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(ConfigFile::default());
    }

    load_config_from(&config_path)
}

/// Load configuration from an explicit file
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(Error::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        Error::InvalidConfig(format!("Failed to read config file: {}", e))
    })?;

    let config: ConfigFile = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Save configuration to an explicit file
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(path, content).map_err(|e| {
        Error::Config(format!("Failed to write config file: {}", e))
    })?;

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.menu.app_name.trim().is_empty() {
        return Err(Error::InvalidInput("Application name cannot be empty".to_string()));
    }

    if config.menu.max_invalid_choices == 0 {
        return Err(Error::InvalidInput(
            "max_invalid_choices must be at least 1".to_string(),
        ));
    }

    if let Some(endpoint) = &config.storage.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(Error::InvalidInput(format!(
                "Endpoint must start with http:// or https:// (got '{}')",
                endpoint
            )));
        }
    }

    if let Some(region) = &config.storage.region {
        if region.trim().is_empty() {
            return Err(Error::InvalidInput("Region cannot be empty".to_string()));
        }
    }

    Ok(())
}
