//! Copying new images into the wallpaper folder.

use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::mime::{is_image_mime, mime_type_for_path};
use super::{FolderReference, FolderUnavailable};

/// Outcome of an import, one list per result kind.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Destination paths of copied images.
    pub copied: Vec<PathBuf>,
    /// Sources skipped because they are not images.
    pub skipped: Vec<PathBuf>,
    /// Sources that failed to copy, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Copies image files into `folder`.
///
/// Files that are not images are skipped. Existing files are never
/// overwritten: a clashing name gets a ` (n)` suffix. A failed copy is
/// logged and recorded, and the remaining sources are still processed.
///
/// # Errors
///
/// Returns `FolderUnavailable` if `folder` is not a directory.
pub fn import_images(
    folder: &FolderReference,
    sources: &[PathBuf],
) -> Result<ImportReport, FolderUnavailable> {
    let dir = folder.to_path();
    if !dir.is_dir() {
        return Err(FolderUnavailable::new(
            folder,
            io::Error::new(ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut report = ImportReport::default();

    for source in sources {
        if !is_image_mime(mime_type_for_path(source)) {
            tracing::debug!(source = %source.display(), "skipping non-image file");
            report.skipped.push(source.clone());
            continue;
        }

        match copy_into(&dir, source) {
            Ok(destination) => {
                tracing::info!(
                    source = %source.display(),
                    destination = %destination.display(),
                    "imported image"
                );
                report.copied.push(destination);
            }
            Err(err) => {
                tracing::warn!(source = %source.display(), error = %err, "failed to import image");
                report.failed.push((source.clone(), err.to_string()));
            }
        }
    }

    Ok(report)
}

fn copy_into(dir: &Path, source: &Path) -> io::Result<PathBuf> {
    let mut input = File::open(source)?;
    let file_name = source
        .file_name()
        .and_then(OsStr::to_str)
        .filter(|name| !name.is_empty())
        .map_or_else(fallback_name, str::to_string);

    // `create_new` keeps a concurrently created file from being clobbered.
    let (destination, mut output) = loop {
        let candidate = unique_destination(dir, &file_name);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => break (candidate, file),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => return Err(err),
        }
    };

    if let Err(err) = io::copy(&mut input, &mut output) {
        drop(output);
        let _ = fs::remove_file(&destination);
        return Err(err);
    }

    Ok(destination)
}

/// Returns `dir/name`, or `dir/stem (n).ext` for the first free `n`.
fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let first = dir.join(name);
    if !first.exists() {
        return first;
    }

    let path = Path::new(name);
    let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or(name);
    let ext = path.extension().and_then(OsStr::to_str);

    (1u32..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn fallback_name() -> String {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis());
    format!("image_{millis}.jpg")
}
