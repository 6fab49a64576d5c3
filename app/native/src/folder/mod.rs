//! Folder registry.
//!
//! The registry remembers a single wallpaper folder across restarts and lists
//! the image files currently inside it.
//!
//! - [`store`] - Persistence of the current [`FolderReference`]
//! - [`source`] - Directory listing and byte streams for entries
//! - [`picker`] - Folder selection as a synchronous collaborator
//! - [`import`] - Copying new images into the folder

pub mod import;
pub mod mime;
pub mod picker;
pub mod source;
pub mod store;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use import::{ImportReport, import_images};
pub use picker::{FolderPicker, PathPicker, PickOutcome, select_folder};
pub use source::{FolderSource, LocalFolderSource};
pub use store::{FolderStore, JsonFolderStore, StoreError};

/// Opaque, persistable handle to the user's wallpaper folder.
///
/// Stored as a single string. Local folders use their absolute path; a
/// `file://` URI is accepted when resolving and its path is percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderReference(String);

impl FolderReference {
    /// Creates a reference from its string form.
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Self { Self(locator.into()) }

    /// Creates a reference for a local directory.
    #[must_use]
    pub fn from_path(path: &Path) -> Self { Self(path.to_string_lossy().into_owned()) }

    /// Returns the string form, as persisted.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Resolves the reference to a local directory path.
    #[must_use]
    pub fn to_path(&self) -> PathBuf {
        let Some(uri_path) = self.0.strip_prefix("file://") else {
            return PathBuf::from(&self.0);
        };
        urlencoding::decode(uri_path)
            .map_or_else(|_| PathBuf::from(uri_path), |decoded| PathBuf::from(decoded.as_ref()))
    }
}

impl fmt::Display for FolderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// One candidate wallpaper file, as seen by a single listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    locator: PathBuf,
    mime_type: String,
    len: u64,
    name: String,
    modified: Option<SystemTime>,
}

impl ImageEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(
        locator: PathBuf,
        mime_type: impl Into<String>,
        len: u64,
        name: impl Into<String>,
        modified: Option<SystemTime>,
    ) -> Self {
        Self {
            locator,
            mime_type: mime_type.into(),
            len,
            name: name.into(),
            modified,
        }
    }

    /// Location of the file content.
    #[must_use]
    pub fn locator(&self) -> &Path { &self.locator }

    /// MIME type, e.g. `image/png`.
    #[must_use]
    pub fn mime_type(&self) -> &str { &self.mime_type }

    /// Size in bytes at listing time.
    #[must_use]
    pub const fn len(&self) -> u64 { self.len }

    /// Whether the file was empty at listing time.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.len == 0 }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Last modification time, if the platform reports one.
    #[must_use]
    pub const fn modified(&self) -> Option<SystemTime> { self.modified }

    /// Whether this entry is a wallpaper candidate.
    #[must_use]
    pub fn is_image(&self) -> bool { mime::is_image_mime(&self.mime_type) }
}

/// The folder reference no longer resolves to a readable directory.
#[derive(Debug, Error)]
#[error("Folder unavailable: {locator}: {source}")]
pub struct FolderUnavailable {
    /// The reference that failed to resolve.
    pub locator: String,
    /// Underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

impl FolderUnavailable {
    /// Creates the error for `folder`.
    #[must_use]
    pub fn new(folder: &FolderReference, source: std::io::Error) -> Self {
        Self { locator: folder.as_str().to_string(), source }
    }
}

/// Lists the image entries currently present in `folder`.
///
/// Entries whose MIME type does not start with `image/` are dropped.
///
/// # Errors
///
/// Returns `FolderUnavailable` if the folder cannot be listed.
pub fn list_image_entries<S: FolderSource + ?Sized>(
    source: &S,
    folder: &FolderReference,
) -> Result<Vec<ImageEntry>, FolderUnavailable> {
    let mut entries = source.list_entries(folder)?;
    entries.retain(ImageEntry::is_image);
    Ok(entries)
}
