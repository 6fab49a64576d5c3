//! Wallpaper CLI commands: list, apply once, and the periodic rotation.

use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::CommandContext;
use crate::cache::format_bytes;
use crate::cli::output;
use crate::config::{WallflipConfig, validate_interval};
use crate::constants::WORK_NAME;
use crate::error::WallflipError;
use crate::folder::{ImageEntry, LocalFolderSource, list_image_entries};
use crate::worker::{PeriodicWorkRequest, Scheduler, TaskInput, WallpaperWorker, Worker};

/// Maximum characters of a file name shown in the listing table.
const NAME_COLUMN_WIDTH: usize = 20;

#[derive(Tabled)]
struct ImageRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
    #[tabled(rename = "Type")]
    mime_type: String,
}

impl From<&ImageEntry> for ImageRow {
    fn from(entry: &ImageEntry) -> Self {
        Self {
            name: output::truncate(entry.name(), NAME_COLUMN_WIDTH),
            size: format_bytes(entry.len()),
            modified: output::format_timestamp(entry.modified()),
            mime_type: entry.mime_type().to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageJson<'a> {
    name: &'a str,
    path: String,
    size: u64,
    mime_type: &'a str,
    modified: Option<String>,
}

impl<'a> From<&'a ImageEntry> for ImageJson<'a> {
    fn from(entry: &'a ImageEntry) -> Self {
        Self {
            name: entry.name(),
            path: entry.locator().to_string_lossy().into_owned(),
            size: entry.len(),
            mime_type: entry.mime_type(),
            modified: entry
                .modified()
                .map(|time| chrono::DateTime::<chrono::Utc>::from(time).to_rfc3339()),
        }
    }
}

/// Lists the images in the selected folder.
///
/// # Errors
///
/// Returns an error if no folder is selected or it cannot be listed.
pub fn execute_list(ctx: &CommandContext, json: bool) -> Result<(), WallflipError> {
    let folder = ctx.require_folder()?;
    let entries = list_image_entries(&LocalFolderSource, &folder)?;

    if json {
        let rows: Vec<ImageJson<'_>> = entries.iter().map(ImageJson::from).collect();
        let rendered = serde_json::to_string_pretty(&rows)
            .map_err(|e| WallflipError::FolderError(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", format!("No images in {folder}").dimmed());
        return Ok(());
    }

    println!("{}", format!("Images ({})", entries.len()).bold());
    println!("{}", render_table(&entries));
    Ok(())
}

/// Renders the listing table, sizes right-aligned.
fn render_table(entries: &[ImageEntry]) -> String {
    Table::new(entries.iter().map(ImageRow::from))
        .with(Style::rounded())
        .with(Modify::new(Columns::one(1)).with(Alignment::right()))
        .to_string()
}

/// Changes the wallpaper once.
///
/// # Errors
///
/// Returns an error if no folder is selected or the change did not succeed.
pub fn execute_apply(ctx: &CommandContext) -> Result<(), WallflipError> {
    let folder = ctx.require_folder()?;
    let outcome = WallpaperWorker::system().do_work(&TaskInput::for_folder(&folder));

    if outcome.is_success() {
        println!("{}", "Wallpaper changed".green());
        Ok(())
    } else {
        Err(WallflipError::WallpaperError(
            "Could not change the wallpaper. Run with -v for details.".to_string(),
        ))
    }
}

/// Starts the periodic rotation and blocks until it stops.
///
/// # Errors
///
/// Returns an error for an out-of-range interval, a missing or empty
/// folder, or if the rotation thread cannot be started.
pub fn execute_start(ctx: &CommandContext, interval: Option<u64>) -> Result<(), WallflipError> {
    let config = rotation_config(&ctx.config.config, interval)?;

    let folder = ctx.require_folder()?;
    if list_image_entries(&LocalFolderSource, &folder)?.is_empty() {
        return Err(WallflipError::FolderError(format!(
            "No images in {folder}. Add some with 'wallflip folder add'."
        )));
    }

    let request = PeriodicWorkRequest::wallpaper(&folder, config.interval_duration());
    let scheduler = Scheduler::new(WallpaperWorker::system());
    scheduler
        .enqueue_unique_periodic(request)
        .map_err(|e| WallflipError::SchedulerError(format!("Failed to start rotation: {e}")))?;

    println!("Changing wallpaper every {} minutes. Press Ctrl+C to stop.", config.interval);
    scheduler.wait(WORK_NAME);
    Ok(())
}

/// Applies a `--interval` override to the loaded configuration.
fn rotation_config(
    config: &WallflipConfig,
    interval: Option<u64>,
) -> Result<WallflipConfig, WallflipError> {
    let mut config = config.clone();
    if let Some(value) = interval {
        config.interval = validate_interval(value)
            .map_err(|e| WallflipError::InvalidArguments(format!("--interval {e}")))?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::constants::minutes;

    fn entry() -> ImageEntry {
        ImageEntry::new(
            PathBuf::from("/walls/an-extremely-long-wallpaper-name.jpg"),
            "image/jpeg",
            3 * 1024,
            "an-extremely-long-wallpaper-name.jpg",
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(86_400)),
        )
    }

    #[test]
    fn test_render_table_lists_every_entry() {
        let small =
            ImageEntry::new(PathBuf::from("/walls/dune.png"), "image/png", 512, "dune.png", None);
        let table = render_table(&[entry(), small]);

        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[1].contains("Name") && lines[1].contains("Size"));
        assert!(table.contains("an-extremely-long-w…"));
        assert!(table.contains("dune.png"));
        assert!(table.contains("3 KB"));
        assert!(table.contains("512 B"));
        assert!(table.contains("image/png"));
        assert!(table.starts_with('╭'));
    }

    #[test]
    fn test_image_row_formats_columns() {
        let row = ImageRow::from(&entry());
        assert_eq!(row.name.chars().count(), NAME_COLUMN_WIDTH);
        assert!(row.name.ends_with('…'));
        assert_eq!(row.size, "3 KB");
        assert_eq!(row.mime_type, "image/jpeg");
        assert_ne!(row.modified, "-");
    }

    #[test]
    fn test_image_json_keeps_full_name() {
        let entry = entry();
        let value = serde_json::to_value(ImageJson::from(&entry)).unwrap();
        assert_eq!(value["name"], "an-extremely-long-wallpaper-name.jpg");
        assert_eq!(value["size"], 3072);
        assert_eq!(value["mimeType"], "image/jpeg");
        assert_eq!(value["modified"], "1970-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_rotation_config_applies_override() {
        let base = WallflipConfig::default();
        assert_eq!(rotation_config(&base, None).unwrap().interval_duration(), minutes(15));
        assert_eq!(rotation_config(&base, Some(60)).unwrap().interval_duration(), minutes(60));
        assert!(matches!(
            rotation_config(&base, Some(181)),
            Err(WallflipError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_execute_start_rejects_out_of_range_interval() {
        let ctx = CommandContext::default();
        let result = execute_start(&ctx, Some(2));
        assert!(matches!(result, Err(WallflipError::InvalidArguments(_))));
    }
}
