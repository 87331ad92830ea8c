//! Wire shapes exchanged with the surrounding application.
//!
//! A [`SleepEntry`] is what the initial data supplier hands over and what a
//! save produces for the persistence sink. Stage rows may arrive with `null`
//! holes or in a shape that no longer parses; those are kept as `None` here and
//! dropped when an edit session is seeded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::stage::StageLabel;
use crate::types::{ConfigError, Segment, SegmentId, ValidationError};
use crate::window::Window;

/// One stored stage row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvent {
    /// Backend id. Absent for rows that have never been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owning sleep entry, assigned by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,

    pub stage_type: StageLabel,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Recomputed from the bounds on output; ignored on input.
    #[serde(default)]
    pub duration_in_seconds: Option<i64>,
}

impl StageEvent {
    /// Builds a validated segment. Rows without an id get a provisional one.
    pub fn to_segment(&self) -> Result<Segment, ValidationError> {
        let id = match self.id.as_deref() {
            Some(id) if !id.is_empty() => SegmentId::new(id)?,
            _ => SegmentId::provisional(),
        };
        Segment::new(id, self.stage_type, self.start_time, self.end_time)
    }
}

impl From<&Segment> for StageEvent {
    fn from(segment: &Segment) -> Self {
        Self {
            id: (!segment.id().is_provisional()).then(|| segment.id().to_string()),
            entry_id: None,
            stage_type: segment.label(),
            start_time: segment.start(),
            end_time: segment.end(),
            duration_in_seconds: Some(segment.duration_seconds()),
        }
    }
}

/// A night of sleep with its stage rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub bedtime: DateTime<Utc>,
    pub wake_time: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_seconds: Option<i64>,

    #[serde(default, deserialize_with = "lenient_stage_events")]
    pub stage_events: Vec<Option<StageEvent>>,
}

impl SleepEntry {
    /// The editable window from bedtime to wake time.
    pub fn window(&self) -> Result<Window, ConfigError> {
        Window::new(self.bedtime, self.wake_time)
    }

    /// Entry for a window and its segments, ready to persist.
    pub fn from_segments(window: &Window, segments: &[Segment]) -> Self {
        Self {
            bedtime: window.start(),
            wake_time: window.end(),
            duration_in_seconds: Some(window.duration().num_seconds()),
            stage_events: segments.iter().map(|s| Some(StageEvent::from(s))).collect(),
        }
    }
}

/// Accepts `null` and unparseable rows as `None` instead of failing the entry.
fn lenient_stage_events<'de, D>(deserializer: D) -> Result<Vec<Option<StageEvent>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|value| {
            if value.is_null() {
                return None;
            }
            serde_json::from_value(value)
                .inspect_err(|e| tracing::warn!(error = %e, "skipping unparseable stage event"))
                .ok()
        })
        .collect())
}
