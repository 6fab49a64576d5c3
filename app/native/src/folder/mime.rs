//! MIME type detection for folder entries.

use std::path::Path;

use image::ImageFormat;

/// MIME type reported for files with an unknown extension.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Returns the MIME type of a file based on its extension.
///
/// Image formats are recognised through `image::ImageFormat`. Formats this
/// build cannot decode are reported as [`UNKNOWN_MIME`] so they never become
/// wallpaper candidates. A few common non-image types are named so listings
/// stay readable.
#[must_use]
pub fn mime_type_for_path(path: &Path) -> &'static str {
    if let Ok(format) = ImageFormat::from_path(path) {
        return if format.reading_enabled() { format.to_mime_type() } else { UNKNOWN_MIME };
    }

    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_lowercase);
    match ext.as_deref() {
        Some("txt" | "md") => "text/plain",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("mp4") => "video/mp4",
        _ => UNKNOWN_MIME,
    }
}

/// Whether a MIME type denotes an image.
#[must_use]
pub fn is_image_mime(mime_type: &str) -> bool { mime_type.starts_with("image/") }
