//! Folder CLI commands.

use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;

use super::CommandContext;
use crate::error::WallflipError;
use crate::folder::{
    FolderStore, LocalFolderSource, PathPicker, PickOutcome, import_images, list_image_entries,
    select_folder,
};

/// Folder management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum FolderCommands {
    /// Choose the folder wallpapers are picked from.
    #[command(after_long_help = r"Examples:
  wallflip folder set ~/Pictures/Wallpapers")]
    Set {
        /// Folder path. Supports `~`.
        path: String,
    },

    /// Show the selected folder.
    Show,

    /// Copy image files into the selected folder.
    ///
    /// Files that are not images are skipped. Existing files are never
    /// overwritten.
    Add {
        /// Image files to copy.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Execute folder subcommands.
///
/// # Errors
///
/// Returns an error if the folder cannot be picked, stored or written to.
pub fn execute(cmd: &FolderCommands, ctx: &CommandContext) -> Result<(), WallflipError> {
    match cmd {
        FolderCommands::Set { path } => set_folder(path, ctx),
        FolderCommands::Show => show_folder(ctx),
        FolderCommands::Add { files } => add_images(files, ctx),
    }
}

fn set_folder(path: &str, ctx: &CommandContext) -> Result<(), WallflipError> {
    let picker = PathPicker::new(Some(path.to_string()));

    match select_folder(&picker, &ctx.store())? {
        PickOutcome::Selected(folder) => {
            let count = list_image_entries(&LocalFolderSource, &folder).map_or(0, |e| e.len());
            println!("{} {folder}", "Folder selected:".green());
            println!("{count} image(s) found");
            Ok(())
        }
        PickOutcome::Declined(reason) => {
            Err(WallflipError::FolderError(format!("Cannot use folder: {reason}")))
        }
        PickOutcome::Cancelled => {
            Err(WallflipError::InvalidArguments("No folder given.".to_string()))
        }
    }
}

fn show_folder(ctx: &CommandContext) -> Result<(), WallflipError> {
    match ctx.store().load_folder()? {
        Some(folder) => println!("{folder}"),
        None => println!("{}", "No folder selected".dimmed()),
    }
    Ok(())
}

fn add_images(files: &[PathBuf], ctx: &CommandContext) -> Result<(), WallflipError> {
    let folder = ctx.require_folder()?;
    let report = import_images(&folder, files)?;

    println!("{} image(s) added", report.copied.len());
    if !report.skipped.is_empty() {
        println!("{} file(s) skipped (not an image)", report.skipped.len());
    }
    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(WallflipError::FolderError(format!(
            "Failed to add {} file(s). Run with -v for details.",
            report.failed.len()
        )))
    }
}
