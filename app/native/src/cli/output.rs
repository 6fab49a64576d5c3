//! CLI output formatting utilities.

use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Truncates a string to a maximum number of characters, adding an ellipsis if needed.
///
/// Counts characters rather than bytes, so multi-byte names are cut safely.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        let truncate_at = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
        format!("{}…", &s[..truncate_at])
    }
}

/// Formats a file timestamp as local `dd/mm/YYYY HH:MM`.
#[must_use]
pub fn format_timestamp(time: Option<SystemTime>) -> String {
    time.map_or_else(
        || "-".to_string(),
        |time| DateTime::<Local>::from(time).format("%d/%m/%Y %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("sunset.jpg", 20), "sunset.jpg");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("a-very-long-wallpaper-name.jpg", 20), "a-very-long-wallpap…");
    }

    #[test]
    fn test_truncate_min_length() {
        assert_eq!(truncate("hello", 1), "…");
    }

    #[test]
    fn test_truncate_multibyte_utf8() {
        assert_eq!(truncate("café-au-lait.png", 5), "café…");
    }

    #[test]
    fn test_format_timestamp_missing() {
        assert_eq!(format_timestamp(None), "-");
    }

    #[test]
    fn test_format_timestamp_shape() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let formatted = format_timestamp(Some(time));
        // Local timezone varies; the layout does not.
        assert_eq!(formatted.len(), 16);
        assert_eq!(&formatted[2..3], "/");
        assert_eq!(&formatted[5..6], "/");
        assert!(formatted[6..10].starts_with("20"));
    }
}
