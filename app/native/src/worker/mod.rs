//! Task boundary for the periodic wallpaper change.
//!
//! A [`Worker`] turns one [`TaskInput`] into a binary [`TaskOutcome`]. Errors
//! are logged here and never travel further; the [`scheduler`] only sees
//! success or failure.

pub mod scheduler;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use scheduler::{PeriodicWorkRequest, Scheduler};

use crate::constants::TASK_FOLDER_URI_KEY;
use crate::folder::{FolderReference, FolderSource, LocalFolderSource};
use crate::wallpaper::{SystemWallpaper, WallpaperService, apply_random_wallpaper};

/// Key/value input handed to every invocation of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskInput(BTreeMap<String, String>);

impl TaskInput {
    /// Builds the input of a wallpaper change for `folder`.
    #[must_use]
    pub fn for_folder(folder: &FolderReference) -> Self {
        let mut values = BTreeMap::new();
        values.insert(TASK_FOLDER_URI_KEY.to_string(), folder.as_str().to_string());
        Self(values)
    }

    /// Returns the string value stored under `key`.
    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<&str> { self.0.get(key).map(String::as_str) }

    /// Returns the folder carried by this input, if any.
    #[must_use]
    pub fn folder(&self) -> Option<FolderReference> {
        self.get_string(TASK_FOLDER_URI_KEY)
            .filter(|value| !value.is_empty())
            .map(FolderReference::new)
    }
}

/// Result reported back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The run completed.
    Success,
    /// The run failed; details were logged.
    Failure,
}

impl TaskOutcome {
    /// Whether the run completed.
    #[must_use]
    pub const fn is_success(self) -> bool { matches!(self, Self::Success) }
}

/// A unit of work the scheduler can run.
pub trait Worker: Send + Sync + 'static {
    /// Performs one run.
    fn do_work(&self, input: &TaskInput) -> TaskOutcome;
}

/// Changes the wallpaper to a random image of the folder named in the input.
#[derive(Debug, Clone, Default)]
pub struct WallpaperWorker<S = LocalFolderSource, W = SystemWallpaper> {
    source: S,
    service: W,
}

impl<S, W> WallpaperWorker<S, W> {
    /// Creates a worker from its collaborators.
    pub const fn new(source: S, service: W) -> Self { Self { source, service } }
}

impl WallpaperWorker {
    /// Creates a worker over the local filesystem and the desktop wallpaper.
    #[must_use]
    pub fn system() -> Self { Self::default() }
}

impl<S, W> Worker for WallpaperWorker<S, W>
where
    S: FolderSource + Send + Sync + 'static,
    W: WallpaperService + Send + Sync + 'static,
{
    fn do_work(&self, input: &TaskInput) -> TaskOutcome {
        tracing::debug!("wallpaper task started");

        let Some(folder) = input.folder() else {
            tracing::error!("folder locator missing from task input");
            return TaskOutcome::Failure;
        };

        match apply_random_wallpaper(&self.source, &self.service, &folder, &mut rand::rng()) {
            Ok(entry) => {
                tracing::info!(image = entry.name(), folder = %folder, "wallpaper changed");
                TaskOutcome::Success
            }
            Err(err) => {
                tracing::warn!(error = %err, folder = %folder, "wallpaper change failed");
                TaskOutcome::Failure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use parking_lot::Mutex;

    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;
    use crate::wallpaper::ApplyError;

    #[derive(Default)]
    struct CountingService {
        calls: Mutex<usize>,
    }

    impl WallpaperService for CountingService {
        fn set_wallpaper(&self, _image: &DynamicImage) -> Result<(), ApplyError> {
            *self.calls.lock() += 1;
            Ok(())
        }
    }

    fn write_png(path: &std::path::Path) {
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])).save(path).unwrap();
    }

    #[test]
    fn test_task_input_carries_folder() {
        let folder = FolderReference::new("/walls");
        let input = TaskInput::for_folder(&folder);
        assert_eq!(input.get_string("folder_uri"), Some("/walls"));
        assert_eq!(input.folder(), Some(folder));
    }

    #[test]
    fn test_task_input_serializes_as_map() {
        let input = TaskInput::for_folder(&FolderReference::new("/walls"));
        assert_eq!(serde_json::to_string(&input).unwrap(), r#"{"folder_uri":"/walls"}"#);
    }

    #[test]
    fn test_missing_folder_input_fails() {
        let worker = WallpaperWorker::new(LocalFolderSource, CountingService::default());
        assert_eq!(worker.do_work(&TaskInput::default()), TaskOutcome::Failure);
        assert_eq!(*worker.service.calls.lock(), 0);
    }

    #[test]
    fn test_worker_succeeds_with_image() {
        let temp = tempfile::tempdir().unwrap();
        write_png(&temp.path().join("a.png"));
        fs::write(temp.path().join("notes.txt"), "x").unwrap();

        let worker = WallpaperWorker::new(LocalFolderSource, CountingService::default());
        let input = TaskInput::for_folder(&FolderReference::from_path(temp.path()));

        assert!(worker.do_work(&input).is_success());
        assert_eq!(*worker.service.calls.lock(), 1);
    }

    #[test]
    fn test_worker_maps_errors_to_failure() {
        let temp = tempfile::tempdir().unwrap();
        let worker = WallpaperWorker::new(LocalFolderSource, CountingService::default());

        let empty = TaskInput::for_folder(&FolderReference::from_path(temp.path()));
        assert_eq!(worker.do_work(&empty), TaskOutcome::Failure);

        let missing =
            TaskInput::for_folder(&FolderReference::from_path(&temp.path().join("missing")));
        assert_eq!(worker.do_work(&missing), TaskOutcome::Failure);

        fs::write(temp.path().join("broken.jpg"), b"not a jpeg").unwrap();
        assert_eq!(worker.do_work(&empty), TaskOutcome::Failure);

        assert_eq!(*worker.service.calls.lock(), 0);
    }
}
