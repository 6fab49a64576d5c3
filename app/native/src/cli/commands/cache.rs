//! Cache CLI commands.

use clap::Subcommand;

use crate::cache::{clear_cache, format_bytes, get_cache_dir};
use crate::error::WallflipError;

/// Cache management commands.
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Remove rendered wallpapers from the cache directory.
    Clear,

    /// Show the cache directory location.
    Path,
}

/// Execute cache subcommands.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be removed.
pub fn execute(cmd: &CacheCommands) -> Result<(), WallflipError> {
    match cmd {
        CacheCommands::Clear => {
            let freed = clear_cache().map_err(|e| {
                WallflipError::CacheError(format!("Failed to clear cache: {e}"))
            })?;
            if freed == 0 {
                println!("Cache is already empty.");
            } else {
                println!("Cleared {} from {}", format_bytes(freed), get_cache_dir().display());
            }
        }
        CacheCommands::Path => println!("{}", get_cache_dir().display()),
    }
    Ok(())
}
