//! Edit command: replays a gesture script over a sleep entry and saves it.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;
use slumber_core::{
    EditSession, PreviewRenderer, SavedSession, Segment, SleepEntry, StageLabel, ToolMode,
};

use super::{format_duration, format_window, read_source};
use crate::Config;

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Gesture {
    /// Drag across `from..to` with the paint tool for `stage`.
    Paint {
        stage: StageLabel,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    /// Drag across `from..to` with the clear tool.
    Clear {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    ClearAll,
    /// Edit bedtime and wake time as `HH:MM` clock times.
    SetTimes { bedtime: String, wake_time: String },
    Discard,
}

/// Logs what a graphical host would draw.
#[derive(Debug, Default)]
struct TraceRenderer;

impl PreviewRenderer for TraceRenderer {
    fn preview(&mut self, segments: &[Segment]) {
        tracing::trace!(segment_count = segments.len(), "preview");
    }

    fn commit(&mut self, segments: &[Segment]) {
        tracing::debug!(segment_count = segments.len(), "render committed segments");
    }
}

/// Loads a gesture script from a JSON file.
pub fn read_script(path: &Path) -> Result<Vec<Gesture>> {
    let raw = read_source(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse gesture script {}", path.display()))
}

pub fn run<W: Write>(
    writer: &mut W,
    entry: SleepEntry,
    gestures: &[Gesture],
    config: &Config,
    json: bool,
) -> Result<()> {
    let mut session = EditSession::from_entry(entry, config.editor, TraceRenderer)
        .context("sleep entry has an unusable window")?;
    replay(&mut session, gestures)?;

    let edited = session.is_dirty();
    let saved = session.save();

    if json {
        let output = serde_json::to_string_pretty(&saved.to_entry())?;
        writeln!(writer, "{output}")?;
    } else {
        write_text(writer, &saved, edited)?;
    }
    Ok(())
}

/// Drives the session through each gesture in order.
pub fn replay<R: PreviewRenderer>(session: &mut EditSession<R>, gestures: &[Gesture]) -> Result<()> {
    for (index, gesture) in gestures.iter().enumerate() {
        tracing::debug!(index, ?gesture, "replaying gesture");
        match gesture {
            Gesture::Paint { stage, from, to } => {
                drag(session, ToolMode::Paint(*stage), *from, *to);
            }
            Gesture::Clear { from, to } => drag(session, ToolMode::Clear, *from, *to),
            Gesture::ClearAll => session.clear_all(),
            Gesture::SetTimes { bedtime, wake_time } => {
                let bedtime = parse_clock(bedtime).with_context(|| format!("gesture {index}: bad bedtime"))?;
                let wake = parse_clock(wake_time).with_context(|| format!("gesture {index}: bad wake time"))?;
                session
                    .edit_times(bedtime, wake)
                    .with_context(|| format!("gesture {index}: invalid window"))?;
            }
            Gesture::Discard => session.discard(),
        }
    }
    Ok(())
}

/// Press at `from`, move to `to`, release.
fn drag<R: PreviewRenderer>(session: &mut EditSession<R>, tool: ToolMode, from: DateTime<Utc>, to: DateTime<Utc>) {
    let window = *session.window();
    session.select_tool(Some(tool));
    session.pointer_down(window.to_fraction(from));
    session.pointer_move(window.to_fraction(to));
    session.pointer_up();
}

fn parse_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").with_context(|| format!("expected HH:MM, got {s:?}"))
}

fn write_text<W: Write>(writer: &mut W, saved: &SavedSession, edited: bool) -> Result<()> {
    writeln!(writer, "{}", format_window(&saved.window))?;
    writeln!(writer, "Status: {}", if edited { "edited" } else { "unchanged" })?;

    if saved.segments.is_empty() {
        writeln!(writer, "No stages recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Segments:")?;
    for segment in &saved.segments {
        writeln!(
            writer,
            "- {segment} ({})",
            format_duration(segment.duration_seconds())
        )?;
    }
    Ok(())
}
