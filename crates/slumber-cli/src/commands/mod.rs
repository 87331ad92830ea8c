//! CLI subcommand implementations.

pub mod edit;
pub mod summary;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use slumber_core::{SleepEntry, Window};

/// Reads a file, or stdin when `path` is `-`.
pub fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Loads a sleep entry from a file or stdin.
pub fn read_entry(path: &Path) -> Result<SleepEntry> {
    let raw = read_source(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse sleep entry from {}", path.display()))
}

/// Format seconds as "Xh Ym" or "Ym".
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "0m".to_string();
    }
    let total_minutes = seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Header line shared by every command's text output.
pub fn format_window(window: &Window) -> String {
    format!(
        "Night: {} .. {} ({})",
        window.start().format("%Y-%m-%d %H:%M"),
        window.end().format("%Y-%m-%d %H:%M"),
        format_duration(window.duration().num_seconds())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(59), "0m");
        assert_eq!(format_duration(45 * 60), "45m");
        assert_eq!(format_duration(3600), "1h 0m");
        assert_eq!(format_duration(8 * 3600 + 15 * 60), "8h 15m");
        assert_eq!(format_duration(-5), "0m");
    }

    #[test]
    fn test_format_window() {
        let window = Window::new(
            Utc.with_ymd_and_hms(2025, 1, 14, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 15, 6, 30, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(
            format_window(&window),
            "Night: 2025-01-14 23:00 .. 2025-01-15 06:30 (7h 30m)"
        );
    }

    #[test]
    fn test_read_entry_reports_path_on_bad_json() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("night.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_entry(&path).unwrap_err();
        assert!(err.to_string().contains("night.json"), "{err}");
    }

    #[test]
    fn test_read_entry_missing_file() {
        let err = read_entry(Path::new("/nonexistent/night.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"), "{err}");
    }
}
