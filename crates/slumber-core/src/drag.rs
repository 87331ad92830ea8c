//! Pointer gesture handling for the timeline.
//!
//! A gesture is a two-state machine: `Idle` until a pointer-down with a tool
//! selected, then `Dragging` until pointer-up. While dragging, every pointer
//! move recomputes the preview from the list as it was when the gesture began,
//! so moving back over already painted time restores what was there.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::snap::{GridSize, snap};
use crate::stage::{StageLabel, UnknownStageLabel};
use crate::store::{TimeRange, clear, consolidate, paint};
use crate::types::{Segment, same_coverage};
use crate::window::Window;

/// What the next drag does to the time it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolMode {
    /// Overwrite with the given stage.
    Paint(StageLabel),
    /// Remove any stage.
    Clear,
}

impl ToolMode {
    fn apply(self, baseline: &[Segment], range: TimeRange) -> Vec<Segment> {
        match self {
            Self::Paint(label) => paint(baseline, range, label),
            Self::Clear => clear(baseline, range),
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paint(label) => write!(f, "{label}"),
            Self::Clear => f.write_str("clear"),
        }
    }
}

impl FromStr for ToolMode {
    type Err = UnknownStageLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "clear" {
            Ok(Self::Clear)
        } else {
            s.parse().map(Self::Paint)
        }
    }
}

/// State carried while the pointer is held down.
#[derive(Debug, Clone)]
struct Gesture {
    tool: ToolMode,
    anchor: DateTime<Utc>,
    /// Last snapped pointer time, used to skip redundant moves.
    last: DateTime<Utc>,
    /// The list as it was at pointer-down. Never mutated.
    baseline: Vec<Segment>,
    preview: Vec<Segment>,
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(Gesture),
}

/// Result of finishing a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    /// Consolidated list to adopt as the new baseline.
    pub segments: Vec<Segment>,
    /// Whether coverage differs from the list at pointer-down.
    pub changed: bool,
    /// Whether the gesture ended on a non-empty snapped range.
    pub moved: bool,
}

/// Translates pointer positions into snapped edits against a window.
#[derive(Debug, Clone)]
pub struct DragMachine {
    window: Window,
    grid: GridSize,
    state: DragState,
}

impl DragMachine {
    pub const fn new(window: Window, grid: GridSize) -> Self {
        Self {
            window,
            grid,
            state: DragState::Idle,
        }
    }

    pub const fn window(&self) -> &Window {
        &self.window
    }

    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Switches to a new window, abandoning any gesture in progress.
    pub fn set_window(&mut self, window: Window) {
        self.cancel();
        self.window = window;
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Where the current gesture started, if one is active.
    pub const fn anchor(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            DragState::Dragging(gesture) => Some(gesture.anchor),
            DragState::Idle => None,
        }
    }

    /// Snapped timestamp under a pointer at `fraction` of the timeline width.
    ///
    /// Positions past either edge are pinned to the edge, and grid points that
    /// fall outside an off-grid window are pulled back inside it.
    pub fn time_at(&self, fraction: f64) -> DateTime<Utc> {
        let raw = self.window.fraction_to_time(fraction);
        self.window.clamp(snap(raw, self.grid))
    }

    /// Starts a gesture. Returns `false` (and stays idle) without a tool, or
    /// when a gesture is already running.
    pub fn pointer_down(&mut self, tool: Option<ToolMode>, fraction: f64, segments: &[Segment]) -> bool {
        let Some(tool) = tool else {
            tracing::trace!("pointer down without a tool, ignoring");
            return false;
        };
        if self.is_dragging() {
            return false;
        }

        let anchor = self.time_at(fraction);
        tracing::debug!(%tool, %anchor, "gesture started");
        self.state = DragState::Dragging(Gesture {
            tool,
            anchor,
            last: anchor,
            baseline: segments.to_vec(),
            preview: segments.to_vec(),
        });
        true
    }

    /// Updates the preview for a pointer at `fraction`.
    ///
    /// Returns the new preview, or `None` when idle or when the snapped time
    /// has not changed since the previous move.
    pub fn pointer_move(&mut self, fraction: f64) -> Option<&[Segment]> {
        let current = self.time_at(fraction);
        let DragState::Dragging(gesture) = &mut self.state else {
            return None;
        };
        if current == gesture.last {
            tracing::trace!(%current, "snapped time unchanged, skipping");
            return None;
        }

        gesture.last = current;
        let range = TimeRange::between(gesture.anchor, current);
        gesture.preview = gesture.tool.apply(&gesture.baseline, range);
        Some(gesture.preview.as_slice())
    }

    /// Ends the gesture and consolidates the preview.
    ///
    /// Returns `None` when no gesture was active.
    pub fn pointer_up(&mut self) -> Option<Committed> {
        let DragState::Dragging(gesture) = std::mem::take(&mut self.state) else {
            return None;
        };

        let segments = consolidate(gesture.preview);
        let changed = !same_coverage(&segments, &gesture.baseline);
        let moved = gesture.last != gesture.anchor;
        tracing::debug!(
            tool = %gesture.tool,
            segment_count = segments.len(),
            changed,
            moved,
            "gesture committed"
        );
        Some(Committed {
            segments,
            changed,
            moved,
        })
    }

    /// Abandons the gesture, handing back the list from pointer-down.
    pub fn cancel(&mut self) -> Option<Vec<Segment>> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(gesture) => {
                tracing::debug!(tool = %gesture.tool, "gesture cancelled");
                Some(gesture.baseline)
            }
            DragState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    /// Minutes after 23:00 on the night of 2025-01-14.
    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 14, 23, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::minutes(minutes)
    }

    /// Window 23:00-07:00, so one hour is 1/8 of the width.
    fn machine() -> DragMachine {
        DragMachine::new(Window::new(ts(0), ts(480)).unwrap(), GridSize::QUARTER_HOUR)
    }

    fn hours(h: f64) -> f64 {
        h / 8.0
    }

    fn light_night() -> Vec<Segment> {
        vec![Segment::provisional(StageLabel::Light, ts(0), ts(480)).unwrap()]
    }

    fn spans(segments: &[Segment]) -> Vec<(StageLabel, i64, i64)> {
        segments
            .iter()
            .map(|s| {
                (
                    s.label(),
                    (s.start() - ts(0)).num_minutes(),
                    (s.end() - ts(0)).num_minutes(),
                )
            })
            .collect()
    }

    #[test]
    fn tool_mode_parses_labels_and_clear() {
        assert_eq!("rem".parse::<ToolMode>().unwrap(), ToolMode::Paint(StageLabel::Rem));
        assert_eq!("clear".parse::<ToolMode>().unwrap(), ToolMode::Clear);
        assert!("erase".parse::<ToolMode>().is_err());
        assert_eq!(ToolMode::Paint(StageLabel::Deep).to_string(), "deep");
    }

    #[test]
    fn pointer_down_without_tool_stays_idle() {
        let mut drag = machine();
        assert!(!drag.pointer_down(None, 0.5, &light_night()));
        assert!(!drag.is_dragging());
        assert!(drag.pointer_move(0.7).is_none());
        assert!(drag.pointer_up().is_none());
    }

    #[test]
    fn pointer_down_snaps_anchor() {
        let mut drag = machine();
        // 2h 7m after bedtime is 01:07, which snaps to 01:00.
        let fraction = 127.0 / 480.0;
        assert!(drag.pointer_down(Some(ToolMode::Clear), fraction, &[]));
        assert_eq!(drag.anchor(), Some(ts(120)));
    }

    #[test]
    fn time_at_pins_positions_to_window() {
        let drag = machine();
        assert_eq!(drag.time_at(-0.3), ts(0));
        assert_eq!(drag.time_at(1.4), ts(480));
        assert_eq!(drag.time_at(f64::NAN), ts(0));
    }

    #[test]
    fn time_at_keeps_off_grid_window_edges_inside() {
        // Bedtime 23:05 snaps to 23:00, which is before the window.
        let window = Window::new(ts(5), ts(475)).unwrap();
        let drag = DragMachine::new(window, GridSize::QUARTER_HOUR);
        assert_eq!(drag.time_at(0.0), ts(5));
        // Wake 06:55 snaps to 07:00, after the window.
        assert_eq!(drag.time_at(1.0), ts(475));
    }

    #[test]
    fn move_paints_from_anchor() {
        let mut drag = machine();
        drag.pointer_down(Some(ToolMode::Paint(StageLabel::Rem)), hours(2.0), &light_night());
        let preview = drag.pointer_move(hours(3.0)).unwrap();
        assert_eq!(
            spans(&consolidate(preview.to_vec())),
            [
                (StageLabel::Light, 0, 120),
                (StageLabel::Rem, 120, 180),
                (StageLabel::Light, 180, 480),
            ]
        );
    }

    #[test]
    fn unchanged_snapped_time_is_skipped() {
        let mut drag = machine();
        drag.pointer_down(Some(ToolMode::Paint(StageLabel::Rem)), hours(2.0), &light_night());
        // Still on the anchor's grid point.
        assert!(drag.pointer_move(hours(2.0) + 0.001).is_none());
        assert!(drag.pointer_move(hours(3.0)).is_some());
        // 03:02 snaps back to 03:00.
        assert!(drag.pointer_move(hours(3.0) + 2.0 / 480.0).is_none());
    }

    #[test]
    fn backward_drag_normalizes_range() {
        let mut drag = machine();
        drag.pointer_down(Some(ToolMode::Paint(StageLabel::Deep)), hours(4.0), &light_night());
        drag.pointer_move(hours(3.0));
        let committed = drag.pointer_up().unwrap();
        assert_eq!(
            spans(&committed.segments),
            [
                (StageLabel::Light, 0, 180),
                (StageLabel::Deep, 180, 240),
                (StageLabel::Light, 240, 480),
            ]
        );
    }

    #[test]
    fn moves_recompute_from_baseline() {
        let mut drag = machine();
        drag.pointer_down(Some(ToolMode::Paint(StageLabel::Awake)), hours(1.0), &light_night());
        drag.pointer_move(hours(5.0));
        // Shrinking the drag gives back the light sleep that was painted over.
        let preview = drag.pointer_move(hours(2.0)).unwrap();
        assert_eq!(
            spans(&consolidate(preview.to_vec())),
            [
                (StageLabel::Light, 0, 60),
                (StageLabel::Awake, 60, 120),
                (StageLabel::Light, 120, 480),
            ]
        );
    }

    #[test]
    fn returning_to_anchor_restores_baseline() {
        let mut drag = machine();
        let baseline = light_night();
        drag.pointer_down(Some(ToolMode::Clear), hours(1.0), &baseline);
        drag.pointer_move(hours(4.0));
        let preview = drag.pointer_move(hours(1.0)).unwrap();
        assert_eq!(preview, &baseline[..]);

        let committed = drag.pointer_up().unwrap();
        assert!(!committed.changed);
        assert!(!committed.moved);
        assert!(same_coverage(&committed.segments, &baseline));
    }

    #[test]
    fn clear_gesture_splits_segment() {
        let mut drag = machine();
        let deep = vec![Segment::provisional(StageLabel::Deep, ts(0), ts(480)).unwrap()];
        drag.pointer_down(Some(ToolMode::Clear), hours(3.0), &deep);
        drag.pointer_move(hours(4.0));
        let committed = drag.pointer_up().unwrap();
        assert!(committed.changed);
        assert_eq!(
            spans(&committed.segments),
            [(StageLabel::Deep, 0, 180), (StageLabel::Deep, 240, 480)]
        );
    }

    #[test]
    fn click_without_move_commits_unchanged() {
        let mut drag = machine();
        drag.pointer_down(Some(ToolMode::Paint(StageLabel::Rem)), hours(2.0), &light_night());
        let committed = drag.pointer_up().unwrap();
        assert!(!committed.changed);
        assert!(!committed.moved);
        assert!(!drag.is_dragging());
        assert_eq!(drag.anchor(), None);
    }

    #[test]
    fn same_label_paint_moves_without_changing() {
        let mut drag = machine();
        let baseline = light_night();
        drag.pointer_down(Some(ToolMode::Paint(StageLabel::Light)), hours(2.0), &baseline);
        drag.pointer_move(hours(3.0));
        let committed = drag.pointer_up().unwrap();
        assert!(committed.moved);
        assert!(!committed.changed);
        assert!(same_coverage(&committed.segments, &baseline));
    }

    #[test]
    fn second_pointer_down_is_ignored_mid_drag() {
        let mut drag = machine();
        drag.pointer_down(Some(ToolMode::Clear), hours(1.0), &light_night());
        assert!(!drag.pointer_down(Some(ToolMode::Clear), hours(6.0), &[]));
        assert_eq!(drag.anchor(), Some(ts(60)));
    }

    #[test]
    fn cancel_returns_baseline() {
        let mut drag = machine();
        let baseline = light_night();
        drag.pointer_down(Some(ToolMode::Clear), hours(1.0), &baseline);
        drag.pointer_move(hours(7.0));
        assert_eq!(drag.cancel(), Some(baseline));
        assert!(!drag.is_dragging());
        assert_eq!(drag.cancel(), None);
    }
}
