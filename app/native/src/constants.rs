//! Application-wide constants.

use std::time::Duration;

/// Application identifier, used for config, data and cache directory names.
pub const APP_ID: &str = "wallflip";

/// Unique name of the periodic wallpaper task.
pub const WORK_NAME: &str = "wallpaper_work";

/// Key of the persisted folder locator in the state file.
pub const FOLDER_URI_KEY: &str = "folderUri";

/// Key of the folder locator in the task input.
pub const TASK_FOLDER_URI_KEY: &str = "folder_uri";

/// Default number of minutes between wallpaper changes.
pub const DEFAULT_INTERVAL_MINUTES: u64 = 15;

/// Shortest allowed interval, in minutes.
pub const MIN_INTERVAL_MINUTES: u64 = 5;

/// Longest allowed interval, in minutes (3 hours).
pub const MAX_INTERVAL_MINUTES: u64 = 180;

/// Converts an interval in minutes to a `Duration`.
#[must_use]
pub const fn minutes(value: u64) -> Duration { Duration::from_secs(value * 60) }
