//! Per-stage totals for a night.

use serde::Serialize;

use crate::stage::StageLabel;
use crate::types::Segment;
use crate::window::Window;

/// Seconds spent in each stage, plus what was left unrecorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub awake_seconds: i64,
    pub rem_seconds: i64,
    pub light_seconds: i64,
    pub deep_seconds: i64,
    /// Window time with no stage recorded.
    pub unspecified_seconds: i64,
    /// Number of separate awake segments.
    pub awake_periods: usize,
}

impl StageSummary {
    pub const fn seconds(&self, label: StageLabel) -> i64 {
        match label {
            StageLabel::Awake => self.awake_seconds,
            StageLabel::Rem => self.rem_seconds,
            StageLabel::Light => self.light_seconds,
            StageLabel::Deep => self.deep_seconds,
        }
    }

    /// Time in any stage other than awake.
    pub const fn asleep_seconds(&self) -> i64 {
        self.rem_seconds + self.light_seconds + self.deep_seconds
    }

    pub const fn covered_seconds(&self) -> i64 {
        self.awake_seconds + self.asleep_seconds()
    }

    const fn slot(&mut self, label: StageLabel) -> &mut i64 {
        match label {
            StageLabel::Awake => &mut self.awake_seconds,
            StageLabel::Rem => &mut self.rem_seconds,
            StageLabel::Light => &mut self.light_seconds,
            StageLabel::Deep => &mut self.deep_seconds,
        }
    }
}

/// Totals a canonical segment list over `window`.
///
/// Segment time outside the window is not counted.
pub fn summarize(window: &Window, segments: &[Segment]) -> StageSummary {
    let mut summary = StageSummary::default();
    for segment in segments {
        let start = window.clamp(segment.start());
        let end = window.clamp(segment.end());
        if end <= start {
            continue;
        }
        *summary.slot(segment.label()) += (end - start).num_seconds();
        if segment.label() == StageLabel::Awake {
            summary.awake_periods += 1;
        }
    }
    summary.unspecified_seconds = (window.duration().num_seconds() - summary.covered_seconds()).max(0);
    summary
}
