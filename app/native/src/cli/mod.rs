//! Command-line interface for wallflip.
//!
//! Parses arguments, sets up logging and dispatches to the command handlers.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;
use tracing_subscriber::EnvFilter;

use crate::error::WallflipError;

/// Builds the log filter. `RUST_LOG` wins over the verbosity flag.
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "wallflip=debug" } else { "warn" })
    })
}

/// Installs the stderr log subscriber. A second call is a no-op.
fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), WallflipError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.execute()
}
