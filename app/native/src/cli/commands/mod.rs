//! CLI command definitions using Clap.
//!
//! - `folder` - Select the wallpaper folder and add images to it
//! - `wallpaper` - List images, change the wallpaper, run the rotation
//! - `config_cmd` - Configuration file management
//! - `cache` - Rendered wallpaper cache management

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config::{self, LoadedConfig};
use crate::error::WallflipError;
use crate::folder::{FolderReference, FolderStore, JsonFolderStore};
use crate::schema;

pub mod cache;
pub mod config_cmd;
pub mod folder;
pub mod wallpaper;

pub use cache::CacheCommands;
pub use config_cmd::ConfigCommands;
pub use folder::FolderCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// wallflip - Change the desktop wallpaper to a random image from a folder.
#[derive(Parser, Debug)]
#[command(name = "wallflip")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr. `RUST_LOG` takes precedence.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Wallpaper folder commands.
    #[command(subcommand)]
    Folder(FolderCommands),

    /// List the images in the wallpaper folder.
    List {
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Change the wallpaper once, right now.
    Apply,

    /// Start changing the wallpaper periodically.
    ///
    /// Changes the wallpaper immediately and then every interval, until the
    /// process is stopped.
    #[command(after_long_help = r"Examples:
  wallflip start                 # Use the configured interval (default 15 minutes)
  wallflip start --interval 60   # Change every hour")]
    Start {
        /// Minutes between changes (5 to 180). Overrides the configuration.
        #[arg(long, short, value_name = "MINUTES")]
        interval: Option<u64>,
    },

    /// Configuration file management commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Rendered wallpaper cache commands.
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Output the configuration JSON Schema.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(wallflip completions --shell zsh)"
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

/// State shared by command handlers.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// The effective configuration.
    pub config: LoadedConfig,
}

impl CommandContext {
    /// Returns the folder store configured for this run.
    #[must_use]
    pub fn store(&self) -> JsonFolderStore { JsonFolderStore::new(self.config.state_file()) }

    /// Loads the persisted folder, failing if none was selected.
    ///
    /// # Errors
    ///
    /// Returns an error if no folder was selected or the state cannot be read.
    pub fn require_folder(&self) -> Result<FolderReference, WallflipError> {
        self.store().load_folder()?.ok_or_else(|| {
            WallflipError::InvalidArguments(
                "No wallpaper folder selected. Run 'wallflip folder set <PATH>' first.".to_string(),
            )
        })
    }
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), WallflipError> {
        match &self.command {
            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                return Ok(());
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                return Ok(());
            }
            Commands::Config(cmd) => return config_cmd::execute(cmd),
            Commands::Cache(cmd) => return cache::execute(cmd),
            _ => {}
        }

        if let Some(path) = &self.config
            && !path.exists()
        {
            return Err(WallflipError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let ctx = CommandContext {
            config: config::load(self.config.as_deref())?,
        };

        match &self.command {
            Commands::Folder(cmd) => folder::execute(cmd, &ctx),
            Commands::List { json } => wallpaper::execute_list(&ctx, *json),
            Commands::Apply => wallpaper::execute_apply(&ctx),
            Commands::Start { interval } => wallpaper::execute_start(&ctx, *interval),
            Commands::Schema
            | Commands::Completions { .. }
            | Commands::Config(_)
            | Commands::Cache(_) => Ok(()),
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "wallflip", &mut io::stdout());
    }
}
