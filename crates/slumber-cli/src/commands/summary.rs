//! Summary command for per-stage sleep totals.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use slumber_core::{SleepEntry, StageLabel, StageSummary, recorded, summarize};

use super::{format_duration, format_window};

#[derive(Serialize)]
struct SummaryReport {
    bedtime: DateTime<Utc>,
    wake_time: DateTime<Utc>,
    #[serde(flatten)]
    stages: StageSummary,
}

/// Totals the stored stages only; an empty night stays unspecified.
pub fn run<W: Write>(writer: &mut W, entry: SleepEntry, json: bool) -> Result<()> {
    let window = entry.window().context("sleep entry has an unusable window")?;
    let segments = recorded(&window, entry.stage_events);
    let summary = summarize(&window, &segments);

    if json {
        let report = SummaryReport {
            bedtime: window.start(),
            wake_time: window.end(),
            stages: summary,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(writer, "{}", format_window(&window))?;
    for label in StageLabel::ALL {
        let total = format_duration(summary.seconds(label));
        if label == StageLabel::Awake {
            let periods = summary.awake_periods;
            let noun = if periods == 1 { "period" } else { "periods" };
            writeln!(writer, "{label}: {total} ({periods} {noun})")?;
        } else {
            writeln!(writer, "{label}: {total}")?;
        }
    }
    writeln!(writer, "unspecified: {}", format_duration(summary.unspecified_seconds))?;
    writeln!(writer, "asleep: {}", format_duration(summary.asleep_seconds()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn entry(stage_events: &str) -> SleepEntry {
        serde_json::from_str(&format!(
            r#"{{"bedtime": "2025-01-14T23:00:00Z", "wake_time": "2025-01-15T07:00:00Z",
                "stage_events": {stage_events}}}"#
        ))
        .unwrap()
    }

    fn event(stage: &str, start: &str, end: &str) -> String {
        format!(r#"{{"stage_type": "{stage}", "start_time": "{start}", "end_time": "{end}"}}"#)
    }

    fn night() -> SleepEntry {
        let events = [
            event("deep", "2025-01-14T23:00:00Z", "2025-01-15T01:00:00Z"),
            event("rem", "2025-01-15T01:00:00Z", "2025-01-15T02:00:00Z"),
            event("awake", "2025-01-15T02:00:00Z", "2025-01-15T02:15:00Z"),
            event("light", "2025-01-15T02:15:00Z", "2025-01-15T06:00:00Z"),
            event("awake", "2025-01-15T06:30:00Z", "2025-01-15T06:45:00Z"),
        ];
        entry(&format!("[{}]", events.join(",")))
    }

    #[test]
    fn test_summary_text() {
        let mut output = Vec::new();
        run(&mut output, night(), false).unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Night: 2025-01-14 23:00 .. 2025-01-15 07:00 (8h 0m)
        awake: 30m (2 periods)
        rem: 1h 0m
        light: 3h 45m
        deep: 2h 0m
        unspecified: 45m
        asleep: 6h 45m
        ");
    }

    #[test]
    fn test_empty_night_is_all_unspecified() {
        let mut output = Vec::new();
        run(&mut output, entry("[null]"), false).unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Night: 2025-01-14 23:00 .. 2025-01-15 07:00 (8h 0m)
        awake: 0m (0 periods)
        rem: 0m
        light: 0m
        deep: 0m
        unspecified: 8h 0m
        asleep: 0m
        ");
    }

    #[test]
    fn test_summary_json() {
        let mut output = Vec::new();
        run(&mut output, night(), true).unwrap();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["bedtime"], "2025-01-14T23:00:00Z");
        assert_eq!(report["awake_seconds"], 30 * 60);
        assert_eq!(report["awake_periods"], 2);
        assert_eq!(report["deep_seconds"], 2 * 3600);
        assert_eq!(report["unspecified_seconds"], 45 * 60);
    }
}
