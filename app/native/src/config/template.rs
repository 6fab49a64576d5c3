//! Configuration template generation.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// wallflip Configuration File
// ===========================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // Minutes between wallpaper changes (5 to 180).
  // "interval": 15,

  // File that remembers the selected wallpaper folder.
  // Supports "~". Relative paths are resolved against this file's directory.
  // Empty means the platform data directory (e.g. ~/.local/share/wallflip/state.json).
  // "stateFile": ""
}
"#
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
