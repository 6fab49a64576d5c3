//! Error types for wallflip.
//!
//! Command handlers return [`WallflipError`]; the binary prints it and exits
//! with a failure status.

use thiserror::Error;

use crate::config::ConfigError;
use crate::folder::{FolderUnavailable, StoreError};

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum WallflipError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Folder selection or access failed.
    #[error("Folder error: {0}")]
    FolderError(String),
    /// Wallpaper change failed.
    #[error("Wallpaper error: {0}")]
    WallpaperError(String),
    /// Cache operation failed.
    #[error("Cache error: {0}")]
    CacheError(String),
    /// Scheduling the periodic task failed.
    #[error("Scheduler error: {0}")]
    SchedulerError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for WallflipError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<ConfigError> for WallflipError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<StoreError> for WallflipError {
    fn from(err: StoreError) -> Self { Self::FolderError(err.to_string()) }
}

impl From<FolderUnavailable> for WallflipError {
    fn from(err: FolderUnavailable) -> Self { Self::FolderError(err.to_string()) }
}
