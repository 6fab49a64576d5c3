//! Random wallpaper selection and application.
//!
//! One run lists the folder, keeps the image entries, picks one uniformly at
//! random, decodes it and hands the pixels to a [`WallpaperService`]. Every
//! failure ends the run; retrying is left to whoever scheduled it.

pub mod service;

use std::io::Read;

use image::DynamicImage;
use rand::Rng;
use thiserror::Error;

pub use service::{ApplyError, SystemWallpaper, WallpaperService};

use crate::folder::{
    FolderReference, FolderSource, FolderUnavailable, ImageEntry, list_image_entries,
};

/// Errors that end a wallpaper change run.
#[derive(Debug, Error)]
pub enum WallpaperTaskError {
    /// The folder could not be listed.
    #[error(transparent)]
    FolderUnavailable(#[from] FolderUnavailable),
    /// The folder holds no image files.
    #[error("No images found in {0}")]
    NoImagesFound(String),
    /// The selected image could not be read.
    #[error("Failed to read image {name}: {source}")]
    ImageUnreadable {
        /// Display name of the image.
        name: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The selected image could not be decoded.
    #[error("Failed to decode image {name}: {source}")]
    ImageDecodeFailed {
        /// Display name of the image.
        name: String,
        /// Decoder failure.
        #[source]
        source: image::ImageError,
    },
    /// The wallpaper service rejected the image.
    #[error(transparent)]
    WallpaperApplyFailed(#[from] ApplyError),
}

/// Picks one entry with probability `1/N` each.
///
/// Returns `None` for an empty slice.
pub fn choose_uniform<'a, T, R>(candidates: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if candidates.is_empty() {
        return None;
    }
    candidates.get(rng.random_range(0..candidates.len()))
}

/// Reads and decodes one entry.
///
/// The stream is dropped before decoding starts, on every path.
///
/// # Errors
///
/// Returns `ImageUnreadable` if the entry cannot be opened or read and
/// `ImageDecodeFailed` if its bytes are not a supported image.
pub fn load_image<S>(source: &S, entry: &ImageEntry) -> Result<DynamicImage, WallpaperTaskError>
where
    S: FolderSource + ?Sized,
{
    let unreadable = |source: std::io::Error| WallpaperTaskError::ImageUnreadable {
        name: entry.name().to_string(),
        source,
    };

    let bytes = {
        let mut stream = source.open(entry).map_err(&unreadable)?;
        let mut bytes = Vec::with_capacity(usize::try_from(entry.len()).unwrap_or_default());
        stream.read_to_end(&mut bytes).map_err(&unreadable)?;
        bytes
    };

    image::load_from_memory(&bytes).map_err(|source| WallpaperTaskError::ImageDecodeFailed {
        name: entry.name().to_string(),
        source,
    })
}

/// Applies a random image from `folder` as the wallpaper.
///
/// Returns the applied entry. Exactly one call is made to `service` on
/// success and none on failure. Consecutive runs may pick the same image.
///
/// # Errors
///
/// Returns the [`WallpaperTaskError`] of the step that failed.
pub fn apply_random_wallpaper<S, W, R>(
    source: &S,
    service: &W,
    folder: &FolderReference,
    rng: &mut R,
) -> Result<ImageEntry, WallpaperTaskError>
where
    S: FolderSource + ?Sized,
    W: WallpaperService + ?Sized,
    R: Rng + ?Sized,
{
    tracing::debug!(folder = %folder, "loading images");
    let images = list_image_entries(source, folder)?;
    tracing::debug!(count = images.len(), "images found");

    let Some(chosen) = choose_uniform(&images, rng) else {
        return Err(WallpaperTaskError::NoImagesFound(folder.to_string()));
    };
    tracing::debug!(image = chosen.name(), "image selected");

    let image = load_image(source, chosen)?;
    service.set_wallpaper(&image)?;

    Ok(chosen.clone())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::io::{self, Cursor};
    use std::path::PathBuf;

    use image::{ImageFormat, Rgb, RgbImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    /// In-memory folder: name -> (mime, bytes). `None` bytes fail to open.
    struct FakeSource {
        files: Vec<(String, String, Option<Vec<u8>>)>,
        available: bool,
        opened: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(files: &[(&str, &str, Option<Vec<u8>>)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(name, mime, bytes)| {
                        ((*name).to_string(), (*mime).to_string(), bytes.clone())
                    })
                    .collect(),
                available: true,
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl FolderSource for FakeSource {
        type Stream = Cursor<Vec<u8>>;

        fn list_entries(
            &self,
            folder: &FolderReference,
        ) -> Result<Vec<ImageEntry>, FolderUnavailable> {
            if !self.available {
                return Err(FolderUnavailable::new(
                    folder,
                    io::Error::new(io::ErrorKind::PermissionDenied, "revoked"),
                ));
            }
            Ok(self
                .files
                .iter()
                .map(|(name, mime, _)| {
                    let locator = PathBuf::from("/fake").join(name);
                    ImageEntry::new(locator, mime.as_str(), 1, name.as_str(), None)
                })
                .collect())
        }

        fn open(&self, entry: &ImageEntry) -> io::Result<Self::Stream> {
            self.opened.borrow_mut().push(entry.name().to_string());
            self.files
                .iter()
                .find(|(name, _, _)| name == entry.name())
                .and_then(|(_, _, bytes)| bytes.clone())
                .map(Cursor::new)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "deleted"))
        }
    }

    #[derive(Default)]
    struct RecordingService {
        calls: Cell<usize>,
        sizes: RefCell<Vec<(u32, u32)>>,
        fail: bool,
    }

    impl WallpaperService for RecordingService {
        fn set_wallpaper(&self, image: &DynamicImage) -> Result<(), ApplyError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ApplyError::SetWallpaperFailed("rejected".to_string()));
            }
            self.sizes.borrow_mut().push((image.width(), image.height()));
            Ok(())
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    fn folder() -> FolderReference { FolderReference::new("/fake") }

    #[test]
    fn test_choose_uniform_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty: [u8; 0] = [];
        assert!(choose_uniform(&empty, &mut rng).is_none());
    }

    #[test]
    fn test_choose_uniform_single_always_selected() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            assert_eq!(choose_uniform(&["only"], &mut rng), Some(&"only"));
        }
    }

    #[test]
    fn test_choose_uniform_is_statistically_uniform() {
        const N: usize = 4;
        const TRIALS: usize = 40_000;
        let candidates: Vec<usize> = (0..N).collect();
        let mut counts = [0usize; N];
        let mut rng = rand::rng();

        for _ in 0..TRIALS {
            counts[*choose_uniform(&candidates, &mut rng).unwrap()] += 1;
        }

        // Expected 10_000 each; standard deviation is about 87.
        let expected = TRIALS / N;
        for count in counts {
            assert!(count.abs_diff(expected) < 1_000, "counts not uniform: {counts:?}");
        }
    }

    #[test]
    fn test_apply_with_single_image_selects_it() {
        let source = FakeSource::new(&[("only.png", "image/png", Some(png_bytes(4, 2)))]);
        let service = RecordingService::default();

        let applied =
            apply_random_wallpaper(&source, &service, &folder(), &mut rand::rng()).unwrap();

        assert_eq!(applied.name(), "only.png");
        assert_eq!(service.calls.get(), 1);
        assert_eq!(*service.sizes.borrow(), vec![(4, 2)]);
    }

    #[test]
    fn test_apply_never_selects_non_images() {
        let source = FakeSource::new(&[
            ("a.jpg", "image/jpeg", Some(png_bytes(1, 1))),
            ("b.png", "image/png", Some(png_bytes(2, 2))),
            ("notes.txt", "text/plain", Some(b"hello".to_vec())),
        ]);
        let service = RecordingService::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashMap::new();

        for _ in 0..200 {
            let applied = apply_random_wallpaper(&source, &service, &folder(), &mut rng).unwrap();
            *seen.entry(applied.name().to_string()).or_insert(0) += 1;
        }

        assert!(!seen.contains_key("notes.txt"));
        assert!(!source.opened.borrow().iter().any(|name| name == "notes.txt"));
        assert!(seen.contains_key("a.jpg"));
        assert!(seen.contains_key("b.png"));
        assert_eq!(service.calls.get(), 200);
    }

    #[test]
    fn test_apply_empty_folder_is_no_images_found() {
        let source = FakeSource::new(&[("notes.txt", "text/plain", Some(b"x".to_vec()))]);
        let service = RecordingService::default();

        let err =
            apply_random_wallpaper(&source, &service, &folder(), &mut rand::rng()).unwrap_err();

        assert!(matches!(err, WallpaperTaskError::NoImagesFound(_)));
        assert_eq!(service.calls.get(), 0);
        assert!(source.opened.borrow().is_empty());
    }

    #[test]
    fn test_apply_unavailable_folder() {
        let mut source = FakeSource::new(&[("a.png", "image/png", Some(png_bytes(1, 1)))]);
        source.available = false;
        let service = RecordingService::default();

        let err =
            apply_random_wallpaper(&source, &service, &folder(), &mut rand::rng()).unwrap_err();

        assert!(matches!(err, WallpaperTaskError::FolderUnavailable(_)));
        assert_eq!(service.calls.get(), 0);
    }

    #[test]
    fn test_apply_open_failure_is_unreadable() {
        let source = FakeSource::new(&[("gone.png", "image/png", None)]);
        let service = RecordingService::default();

        let err =
            apply_random_wallpaper(&source, &service, &folder(), &mut rand::rng()).unwrap_err();

        match err {
            WallpaperTaskError::ImageUnreadable { name, .. } => assert_eq!(name, "gone.png"),
            other => panic!("Expected ImageUnreadable, got {other:?}"),
        }
        assert_eq!(service.calls.get(), 0);
    }

    #[test]
    fn test_apply_corrupt_image_is_decode_failure() {
        let source =
            FakeSource::new(&[("broken.png", "image/png", Some(b"not a png".to_vec()))]);
        let service = RecordingService::default();

        let err =
            apply_random_wallpaper(&source, &service, &folder(), &mut rand::rng()).unwrap_err();

        assert!(matches!(err, WallpaperTaskError::ImageDecodeFailed { .. }));
        assert_eq!(service.calls.get(), 0);
    }

    #[test]
    fn test_apply_service_failure_is_apply_failed() {
        let source = FakeSource::new(&[("a.png", "image/png", Some(png_bytes(1, 1)))]);
        let service = RecordingService { fail: true, ..Default::default() };

        let err =
            apply_random_wallpaper(&source, &service, &folder(), &mut rand::rng()).unwrap_err();

        assert!(matches!(err, WallpaperTaskError::WallpaperApplyFailed(_)));
        assert_eq!(service.calls.get(), 1);
    }

    #[test]
    fn test_task_error_display() {
        let err = WallpaperTaskError::NoImagesFound("/walls".to_string());
        assert_eq!(err.to_string(), "No images found in /walls");
    }
}
