//! Directory listing and content streams for folder entries.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};

use natord::compare;

use super::mime::mime_type_for_path;
use super::{FolderReference, FolderUnavailable, ImageEntry};

/// Access to the entries of a folder and to their content.
pub trait FolderSource {
    /// Readable stream over one entry's bytes.
    type Stream: Read;

    /// Lists every file currently present in `folder`, with its MIME type.
    ///
    /// # Errors
    ///
    /// Returns `FolderUnavailable` if the folder no longer resolves.
    fn list_entries(&self, folder: &FolderReference) -> Result<Vec<ImageEntry>, FolderUnavailable>;

    /// Opens a readable stream for `entry`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the entry was removed or cannot be read.
    fn open(&self, entry: &ImageEntry) -> io::Result<Self::Stream>;
}

/// Folder source backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFolderSource;

impl FolderSource for LocalFolderSource {
    type Stream = BufReader<File>;

    fn list_entries(&self, folder: &FolderReference) -> Result<Vec<ImageEntry>, FolderUnavailable> {
        let dir = folder.to_path();
        let read_dir = fs::read_dir(&dir).map_err(|err| FolderUnavailable::new(folder, err))?;

        let mut entries: Vec<ImageEntry> = read_dir
            .flatten()
            .filter_map(|entry| {
                // Follows symlinks; entries removed mid-listing drop out.
                let path = entry.path();
                let metadata = fs::metadata(&path).ok()?;
                if !metadata.is_file() {
                    return None;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                Some(ImageEntry::new(
                    path.clone(),
                    mime_type_for_path(&path),
                    metadata.len(),
                    name,
                    metadata.modified().ok(),
                ))
            })
            .collect();

        entries.sort_by(|a, b| compare(a.name(), b.name()));
        Ok(entries)
    }

    fn open(&self, entry: &ImageEntry) -> io::Result<Self::Stream> {
        File::open(entry.locator()).map(BufReader::new)
    }
}
