//! Configuration module for wallflip.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.
//!
//! Configuration is loaded once per command and passed down explicitly.

pub mod template;
pub mod types;

use std::path::{Path, PathBuf};

pub use types::{
    ConfigError, WallflipConfig, config_paths, default_state_file, load_config,
    load_config_from_path, validate_interval,
};

/// A configuration together with the file it came from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The effective configuration.
    pub config: WallflipConfig,
    /// Path of the loaded file, `None` when running on defaults.
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Returns the resolved state file path.
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        let config_dir = self.path.as_deref().and_then(Path::parent);
        self.config.state_file_path(config_dir)
    }
}

/// Loads the configuration.
///
/// With a custom path the file must exist and parse. Without one, the
/// default search paths are tried; a missing file means defaults, and an
/// unreadable or invalid file is logged and replaced by defaults. An
/// out-of-range interval is logged and reset to the default.
///
/// # Errors
///
/// Returns an error only for a custom path that cannot be loaded.
pub fn load(custom_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let (mut config, path) = match custom_path {
        Some(path) => {
            let (config, path) = load_config_from_path(path)?;
            (config, Some(path))
        }
        None => load_or_default(),
    };

    if let Err(err) = config.validate() {
        tracing::warn!(error = %err, "invalid configuration value, using default interval");
        config.interval = WallflipConfig::default().interval;
    }

    Ok(LoadedConfig { config, path })
}

fn load_or_default() -> (WallflipConfig, Option<PathBuf>) {
    match load_config() {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            (config, Some(path))
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            (WallflipConfig::default(), None)
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            (WallflipConfig::default(), None)
        }
    }
}
