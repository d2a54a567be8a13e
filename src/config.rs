//! Search configuration
//!
//! Stored as pretty JSON at `<config dir>/gym-search/config.json`. A missing
//! file means defaults; CLI flags override whatever is loaded.

use crate::error::AppError;
use crate::search::controller::{ControllerOptions, DEFAULT_DEBOUNCE_MS};
use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Upper bound on the debounce delay
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SearchConfig {
    /// Delay between the last query change and re-ranking, in milliseconds
    pub debounce_delay_ms: u64,
    /// Report the best match after each re-rank
    pub auto_select: bool,
    /// Maximum number of results to print (all when unset)
    pub limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_delay_ms: DEFAULT_DEBOUNCE_MS,
            auto_select: false,
            limit: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.debounce_delay_ms > MAX_DEBOUNCE_MS {
            return Err(AppError::ConfigError(format!(
                "debounce_delay_ms must be at most {}",
                MAX_DEBOUNCE_MS
            )));
        }
        if self.limit == Some(0) {
            return Err(AppError::ConfigError("limit must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            debounce_delay: Duration::from_millis(self.debounce_delay_ms),
            auto_select: self.auto_select,
        }
    }

    /// JSON schema of the config file
    pub fn schema_json() -> Result<String> {
        let schema = schemars::schema_for!(SearchConfig);
        serde_json::to_string_pretty(&schema).context("Failed to serialize config schema")
    }
}

/// Get the path to the default configuration file
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
    Ok(config_dir.join("gym-search").join("config.json"))
}

/// Use the explicit path when given, else the default location
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Load the configuration from disk
pub fn load_config(path: &Path) -> Result<SearchConfig> {
    // If file doesn't exist, return default config
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(SearchConfig::default());
    }

    let data = fs::read_to_string(path).map_err(|e| {
        AppError::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    let config: SearchConfig = serde_json::from_str(&data).map_err(|e| {
        AppError::ConfigError(format!("Failed to parse config file {}: {}", path.display(), e))
    })?;

    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Save the configuration to disk
pub fn save_config(path: &Path, config: &SearchConfig) -> Result<()> {
    config.validate()?;

    // Create directory if it doesn't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let data = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    // Write to a temp file and rename so readers never see a partial file
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, data).context("Failed to write config file")?;
    fs::rename(&tmp_path, path).context("Failed to replace config file")?;

    Ok(())
}
