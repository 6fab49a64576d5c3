//! Config CLI commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, config_paths};
use crate::error::WallflipError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Write a configuration file with every option documented and commented out.
    #[command(
        name = "init",
        after_long_help = r"Examples:
  wallflip config init                          # Create config at the default location
  wallflip config init --force                  # Overwrite an existing config
  wallflip config init --path ~/wallflip.jsonc  # Create at a custom path
  wallflip config init --stdout                 # Print the template"
    )]
    Init {
        /// Overwrite the configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Where to write the file. Defaults to ~/.config/wallflip/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the template to stdout instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show where configuration is looked up and where the folder is stored.
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be written.
pub fn execute(cmd: &ConfigCommands) -> Result<(), WallflipError> {
    match cmd {
        ConfigCommands::Init { stdout: true, .. } => {
            println!("{}", generate_config_template());
            Ok(())
        }
        ConfigCommands::Init { force, path, .. } => init_config(*force, path.clone()),
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
    }
}

fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), WallflipError> {
    let target = custom_path
        .or_else(|| config_paths().into_iter().next())
        .unwrap_or_else(|| PathBuf::from("config.jsonc"));

    if target.exists() && !force {
        return Err(WallflipError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            target.display()
        )));
    }

    create_config_file(&target).map_err(|e| {
        WallflipError::ConfigError(format!(
            "Failed to create config file {}: {e}",
            target.display()
        ))
    })?;

    println!("Configuration file created at: {}", target.display());
    println!("Uncomment the options you want to change.");
    Ok(())
}

fn show_config_path() {
    let paths = config_paths();
    println!("Configuration file search paths (in priority order):\n");

    let markers = path_markers(&paths, Path::exists);
    for (i, (path, marker)) in paths.iter().zip(&markers).enumerate() {
        println!("  {}. {}{marker}", i + 1, path.display());
    }

    if !markers.iter().any(|m| !m.is_empty()) {
        println!("\nNo configuration file found. Run 'wallflip config init' to create one.");
    }

    // Mirrors what `load` would pick, ignoring an unreadable file.
    let state_file = config::load(None).unwrap_or_default().state_file();
    println!("\nFolder state file: {}", state_file.display());
}

/// Labels each candidate: the first existing one is active, later ones are shadowed.
fn path_markers(paths: &[PathBuf], exists: impl Fn(&Path) -> bool) -> Vec<&'static str> {
    let mut active_seen = false;
    paths
        .iter()
        .map(|path| match (exists(path.as_path()), active_seen) {
            (true, false) => {
                active_seen = true;
                " (active)"
            }
            (true, true) => " (shadowed)",
            (false, _) => "",
        })
        .collect()
}
