//! System wallpaper service.
//!
//! The desktop wallpaper APIs take a file path, so a decoded image is first
//! rendered as a JPEG into the cache directory and then handed to the OS.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;
use uuid::Uuid;

use crate::cache::get_cache_subdir;

/// JPEG quality used for rendered wallpapers.
const JPEG_QUALITY: u8 = 95;

/// File name prefix of rendered wallpapers.
const RENDERED_PREFIX: &str = "wallpaper-";

/// Errors raised while applying a wallpaper.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The image could not be written where the OS can read it.
    #[error("Failed to render wallpaper to {path}: {message}")]
    Render {
        /// Destination of the rendered file.
        path: String,
        /// Cause of the failure.
        message: String,
    },
    /// The operating system rejected the wallpaper.
    #[error("Failed to set wallpaper: {0}")]
    SetWallpaperFailed(String),
}

/// Applies a pixel buffer as the current wallpaper.
pub trait WallpaperService {
    /// Sets `image` as the wallpaper.
    ///
    /// # Errors
    ///
    /// Returns `ApplyError` if the wallpaper could not be applied.
    fn set_wallpaper(&self, image: &DynamicImage) -> Result<(), ApplyError>;
}

/// Wallpaper service backed by the desktop environment.
#[derive(Debug, Clone)]
pub struct SystemWallpaper {
    render_dir: PathBuf,
}

impl Default for SystemWallpaper {
    fn default() -> Self { Self::new(get_cache_subdir("wallpapers")) }
}

impl SystemWallpaper {
    /// Creates a service that renders into `render_dir`.
    #[must_use]
    pub fn new(render_dir: impl Into<PathBuf>) -> Self { Self { render_dir: render_dir.into() } }

    /// Directory holding rendered wallpapers.
    #[must_use]
    pub fn render_dir(&self) -> &Path { &self.render_dir }

    /// Renders `image` as a JPEG with a fresh file name and returns its path.
    ///
    /// A new name per render keeps desktops that cache by path from showing
    /// the previous image.
    ///
    /// # Errors
    ///
    /// Returns `ApplyError::Render` if the directory or file cannot be written.
    pub fn render(&self, image: &DynamicImage) -> Result<PathBuf, ApplyError> {
        let render_error = |path: &Path, err: &dyn std::fmt::Display| ApplyError::Render {
            path: path.display().to_string(),
            message: err.to_string(),
        };

        fs::create_dir_all(&self.render_dir).map_err(|e| render_error(&self.render_dir, &e))?;

        let path = self.render_dir.join(format!("{RENDERED_PREFIX}{}.jpg", Uuid::now_v7()));
        let file = File::create(&path).map_err(|e| render_error(&path, &e))?;
        let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
        image.to_rgb8().write_with_encoder(encoder).map_err(|e| render_error(&path, &e))?;

        Ok(path)
    }

    /// Removes rendered wallpapers other than `keep`.
    fn prune(&self, keep: &Path) {
        let Ok(entries) = fs::read_dir(&self.render_dir) else {
            return;
        };

        for path in entries.flatten().map(|entry| entry.path()) {
            let is_rendered = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(RENDERED_PREFIX));
            if is_rendered
                && path != keep
                && let Err(err) = fs::remove_file(&path)
            {
                tracing::debug!(path = %path.display(), error = %err, "failed to prune wallpaper");
            }
        }
    }
}

impl WallpaperService for SystemWallpaper {
    fn set_wallpaper(&self, image: &DynamicImage) -> Result<(), ApplyError> {
        let path = self.render(image)?;
        let path_str = path.display().to_string();

        if let Err(err) = ::wallpaper::set_from_path(&path_str) {
            let _ = fs::remove_file(&path);
            return Err(ApplyError::SetWallpaperFailed(err.to_string()));
        }

        self.prune(&path);
        Ok(())
    }
}
