//! Folder selection.
//!
//! Picking a folder is modeled as a synchronous collaborator that either
//! hands back a usable reference or reports why it did not.

use std::fs;

use super::{FolderReference, FolderStore, StoreError};
use crate::platform::path::expand;

/// Result of asking the user for a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// A readable folder was chosen.
    Selected(FolderReference),
    /// A folder was offered but cannot be used.
    Declined(String),
    /// Nothing was chosen.
    Cancelled,
}

/// Source of a user folder choice.
pub trait FolderPicker {
    /// Asks for a folder and returns the outcome.
    fn pick_folder(&self) -> PickOutcome;
}

/// Picker for a folder given on the command line.
///
/// Expands `~`, canonicalizes the path and checks the directory can be read.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    candidate: Option<String>,
}

impl PathPicker {
    /// Creates a picker for `candidate`; `None` behaves as a cancelled pick.
    #[must_use]
    pub const fn new(candidate: Option<String>) -> Self { Self { candidate } }
}

impl FolderPicker for PathPicker {
    fn pick_folder(&self) -> PickOutcome {
        let Some(candidate) = self.candidate.as_deref().filter(|c| !c.trim().is_empty()) else {
            return PickOutcome::Cancelled;
        };

        let path = match expand(candidate).canonicalize() {
            Ok(path) => path,
            Err(err) => return PickOutcome::Declined(format!("{candidate}: {err}")),
        };

        if !path.is_dir() {
            return PickOutcome::Declined(format!("{} is not a directory", path.display()));
        }

        if let Err(err) = fs::read_dir(&path) {
            return PickOutcome::Declined(format!("{} is not readable: {err}", path.display()));
        }

        PickOutcome::Selected(FolderReference::from_path(&path))
    }
}

/// Runs `picker` and persists a selected folder in `store`.
///
/// Declined and cancelled picks leave the store untouched.
///
/// # Errors
///
/// Returns an error if a selected folder cannot be persisted.
pub fn select_folder<P, S>(picker: &P, store: &S) -> Result<PickOutcome, StoreError>
where
    P: FolderPicker + ?Sized,
    S: FolderStore + ?Sized,
{
    let outcome = picker.pick_folder();

    match &outcome {
        PickOutcome::Selected(folder) => {
            store.save_folder(folder)?;
            tracing::info!(folder = %folder, "wallpaper folder selected");
        }
        PickOutcome::Declined(reason) => tracing::debug!(reason = %reason, "folder pick declined"),
        PickOutcome::Cancelled => tracing::debug!("folder pick cancelled"),
    }

    Ok(outcome)
}
