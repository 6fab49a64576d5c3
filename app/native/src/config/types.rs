//! Configuration types and file discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    APP_ID, DEFAULT_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES, minutes,
};
use crate::platform::path::expand_and_resolve;

/// Configuration file names, in priority order.
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Name of the persisted state file.
const STATE_FILE_NAME: &str = "state.json";

/// Root configuration for wallflip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WallflipConfig {
    /// Minutes between wallpaper changes.
    /// Must be between 5 and 180. Defaults to 15.
    pub interval: u64,

    /// Path of the file that remembers the selected folder.
    /// Supports `~`; relative paths are resolved against the config file directory.
    /// Defaults to `<data dir>/wallflip/state.json` when empty.
    pub state_file: String,
}

impl Default for WallflipConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_MINUTES,
            state_file: String::new(),
        }
    }
}

impl WallflipConfig {
    /// Checks the configured values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidInterval` if the interval is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_interval(self.interval)?;
        Ok(())
    }

    /// Returns the interval as a `Duration`.
    #[must_use]
    pub const fn interval_duration(&self) -> Duration { minutes(self.interval) }

    /// Returns the path of the state file.
    ///
    /// `config_dir` is the directory of the loaded config file, used to
    /// resolve a relative `stateFile`.
    #[must_use]
    pub fn state_file_path(&self, config_dir: Option<&Path>) -> PathBuf {
        if self.state_file.trim().is_empty() {
            return default_state_file();
        }

        let base = config_dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        expand_and_resolve(&self.state_file, &base)
    }
}

/// Returns the default state file location.
#[must_use]
pub fn default_state_file() -> PathBuf {
    dirs::data_dir()
        .map_or_else(|| PathBuf::from(format!("/tmp/{APP_ID}")), |dir| dir.join(APP_ID))
        .join(STATE_FILE_NAME)
}

/// Validates a wallpaper change interval in minutes.
///
/// # Errors
///
/// Returns `ConfigError::InvalidInterval` if `value` is outside
/// `MIN_INTERVAL_MINUTES..=MAX_INTERVAL_MINUTES`.
pub fn validate_interval(value: u64) -> Result<u64, ConfigError> {
    if !(MIN_INTERVAL_MINUTES..=MAX_INTERVAL_MINUTES).contains(&value) {
        return Err(ConfigError::InvalidInterval(value));
    }
    Ok(value)
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found.
    #[error("No configuration file found")]
    NotFound,
    /// The configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
    /// The interval is outside the allowed range.
    #[error("Invalid interval {0}: must be between 5 and 180 minutes")]
    InvalidInterval(u64),
}

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/wallflip/config.jsonc` or `config.json`
/// 2. `~/.config/wallflip/config.jsonc` or `config.json`
/// 3. The platform config directory (`~/Library/Application Support/wallflip` on macOS)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_in_order = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_in_order.push(PathBuf::from(xdg_config).join(APP_ID));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_in_order.push(home.join(".config").join(APP_ID));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_in_order.push(config_dir.join(APP_ID));
    }

    let mut paths = Vec::new();
    for dir in dirs_in_order {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// Comments are stripped before parsing (JSONC).
///
/// # Errors
///
/// Returns `ConfigError::IoError` if the file cannot be read and
/// `ConfigError::ParseError` if it is not valid JSON.
pub fn load_config_from_path(path: &Path) -> Result<(WallflipConfig, PathBuf), ConfigError> {
    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: WallflipConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists, or the
/// errors of [`load_config_from_path`] for the first file found.
pub fn load_config() -> Result<(WallflipConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}
