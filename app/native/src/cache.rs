//! Cache directory utilities.
//!
//! Rendered wallpapers live under the platform cache directory
//! (`~/.cache/wallflip` on Linux, `~/Library/Caches/wallflip` on macOS),
//! with a fallback to `/tmp/wallflip` if the cache directory is unavailable.

use std::path::{Path, PathBuf};

use crate::constants::APP_ID;

/// Returns the root cache directory for the application.
#[must_use]
pub fn get_cache_dir() -> PathBuf {
    dirs::cache_dir().map_or_else(
        || PathBuf::from(format!("/tmp/{APP_ID}")),
        |cache| cache.join(APP_ID),
    )
}

/// Returns a cache subdirectory for the given component.
///
/// # Arguments
///
/// * `subdir` - The subdirectory name within the app's cache directory (e.g., `wallpapers`)
#[must_use]
pub fn get_cache_subdir(subdir: &str) -> PathBuf { get_cache_dir().join(subdir) }

/// Clears the entire cache directory.
///
/// # Returns
///
/// * `Ok(bytes_freed)` - The approximate number of bytes freed (0 if there was no cache)
///
/// # Errors
///
/// Returns an error on permission or I/O failures while removing files.
pub fn clear_cache() -> std::io::Result<u64> { clear_dir(&get_cache_dir()) }

fn clear_dir(dir: &Path) -> std::io::Result<u64> {
    if !dir.exists() {
        return Ok(0);
    }

    let bytes_freed = calculate_dir_size(dir)?;
    std::fs::remove_dir_all(dir)?;

    Ok(bytes_freed)
}

/// Calculates the total size of a directory in bytes.
fn calculate_dir_size(path: &Path) -> std::io::Result<u64> {
    let mut total = 0u64;

    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                total += calculate_dir_size(&path)?;
            } else {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
    }

    Ok(total)
}

/// Formats a byte count the way file sizes are shown in listings.
///
/// Whole units only: "512 B", "3 KB", "12 MB".
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} MB", bytes / MB)
    }
}
