//! Persistence of the current wallpaper folder.
//!
//! The state file is a flat JSON object of string values. Only the
//! `folderUri` key is used; unknown keys are preserved on save.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use super::FolderReference;
use crate::constants::FOLDER_URI_KEY;

/// Errors raised while reading or writing the state file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the state file failed.
    #[error("State file I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The state file is not a JSON object of strings.
    #[error("State file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persists a single folder reference across process restarts.
pub trait FolderStore {
    /// Persists `folder`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn save_folder(&self, folder: &FolderReference) -> Result<(), StoreError>;

    /// Returns the previously saved folder, or `None` if never set.
    ///
    /// # Errors
    ///
    /// Returns an error if persisted state exists but cannot be read.
    fn load_folder(&self) -> Result<Option<FolderReference>, StoreError>;
}

/// Folder store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFolderStore {
    path: PathBuf,
}

impl JsonFolderStore {
    /// Creates a store for the state file at `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// Path of the state file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn read_state(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_state(&self, state: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        // Write next to the target and rename, so readers never see a partial file.
        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.persist(&self.path).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }
}

impl FolderStore for JsonFolderStore {
    fn save_folder(&self, folder: &FolderReference) -> Result<(), StoreError> {
        let mut state = self.read_state().unwrap_or_else(|err| {
            tracing::warn!(
                error = %err,
                path = %self.path.display(),
                "discarding unreadable state file"
            );
            BTreeMap::new()
        });
        state.insert(FOLDER_URI_KEY.to_string(), folder.as_str().to_string());
        self.write_state(&state)?;

        tracing::debug!(folder = %folder, path = %self.path.display(), "saved folder");
        Ok(())
    }

    fn load_folder(&self) -> Result<Option<FolderReference>, StoreError> {
        let state = self.read_state()?;
        Ok(state
            .get(FOLDER_URI_KEY)
            .filter(|value| !value.is_empty())
            .map(FolderReference::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_folder_without_state_returns_none() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonFolderStore::new(temp.path().join("state.json"));
        assert!(store.load_folder().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_returns_folder() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonFolderStore::new(temp.path().join("nested/state.json"));
        store.save_folder(&FolderReference::new("/walls")).unwrap();

        assert_eq!(store.load_folder().unwrap(), Some(FolderReference::new("/walls")));
    }

    #[test]
    fn test_resave_overwrites_previous_folder() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonFolderStore::new(temp.path().join("state.json"));
        store.save_folder(&FolderReference::new("/old")).unwrap();
        store.save_folder(&FolderReference::new("/new")).unwrap();

        assert_eq!(store.load_folder().unwrap(), Some(FolderReference::new("/new")));
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(!content.contains("/old"));
    }

    #[test]
    fn test_state_file_uses_folder_uri_key() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonFolderStore::new(temp.path().join("state.json"));
        store.save_folder(&FolderReference::new("/walls")).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["folderUri"], "/walls");
    }

    #[test]
    fn test_save_keeps_unknown_keys() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, r#"{ "other": "kept" }"#).unwrap();
        let store = JsonFolderStore::new(&path);
        store.save_folder(&FolderReference::new("/walls")).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["other"], "kept");
    }

    #[test]
    fn test_load_corrupt_state_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonFolderStore::new(&path);

        assert!(matches!(store.load_folder(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_save_over_corrupt_state_recovers() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonFolderStore::new(&path);
        store.save_folder(&FolderReference::new("/walls")).unwrap();

        assert_eq!(store.load_folder().unwrap(), Some(FolderReference::new("/walls")));
    }

    #[test]
    fn test_empty_value_loads_as_none() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, r#"{ "folderUri": "" }"#).unwrap();
        assert!(JsonFolderStore::new(&path).load_folder().unwrap().is_none());
    }
}
