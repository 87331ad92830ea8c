//! Edit sessions over one night's sleep stages.
//!
//! An [`EditSession`] owns the window, the canonical segment list, the drag
//! machine and the dirty flag. It is the only thing the host UI talks to:
//! the host feeds it tool selections and pointer events, and gets segment
//! lists back through a [`PreviewRenderer`] and from [`EditSession::save`].

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::drag::{DragMachine, ToolMode};
use crate::entry::{SleepEntry, StageEvent};
use crate::snap::GridSize;
use crate::stage::StageLabel;
use crate::store::{consolidate, overwrite};
use crate::summary::{StageSummary, summarize};
use crate::types::{ConfigError, Segment, ValidationError};
use crate::window::{SegmentGeometry, Window};

/// Editor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snapping grid for pointer positions, in minutes.
    pub grid_minutes: GridSize,

    /// Stage used for the single segment seeded into an empty night.
    pub default_label: StageLabel,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_minutes: GridSize::QUARTER_HOUR,
            default_label: StageLabel::Light,
        }
    }
}

/// Receives segment lists for display.
pub trait PreviewRenderer {
    /// Live list while a drag is in progress. May be unsorted.
    fn preview(&mut self, segments: &[Segment]);

    /// Canonical list after a gesture, clear-all, reseed or discard.
    fn commit(&mut self, segments: &[Segment]) {
        self.preview(segments);
    }
}

/// Renderer that ignores everything.
impl PreviewRenderer for () {
    fn preview(&mut self, _segments: &[Segment]) {}
}

/// What a save hands to the persistence sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub window: Window,
    pub segments: Vec<Segment>,
}

impl SavedSession {
    /// Wire form, with provisional ids left for the backend to assign.
    pub fn to_entry(&self) -> SleepEntry {
        SleepEntry::from_segments(&self.window, &self.segments)
    }
}

/// Canonical list of the stored rows that fit `window`.
///
/// `None` holes and rows that are empty, inverted or reach outside the window
/// are dropped. Overlapping rows are resolved in order, later rows winning.
pub fn recorded<I>(window: &Window, initial: I) -> Vec<Segment>
where
    I: IntoIterator<Item = Option<StageEvent>>,
{
    let mut segments: Vec<Segment> = Vec::new();
    for event in initial.into_iter().flatten() {
        match validated(window, &event) {
            Ok(segment) => segments = overwrite(&segments, segment),
            Err(e) => tracing::warn!(error = %e, "dropping malformed stage event"),
        }
    }
    consolidate(segments)
}

/// Builds the starting list for an edit session.
///
/// Same as [`recorded`], except that a night with nothing usable starts as one
/// `default_label` segment spanning the whole window.
pub fn seed<I>(window: &Window, initial: I, default_label: StageLabel) -> Vec<Segment>
where
    I: IntoIterator<Item = Option<StageEvent>>,
{
    let segments = recorded(window, initial);
    if segments.is_empty() {
        tracing::debug!(label = %default_label, "seeding default segment");
        return vec![Segment::covering(window, default_label)];
    }
    segments
}

fn validated(window: &Window, event: &StageEvent) -> Result<Segment, ValidationError> {
    let segment = event.to_segment()?;
    if !window.contains_span(segment.start(), segment.end()) {
        return Err(ValidationError::OutOfWindow {
            start: segment.start(),
            end: segment.end(),
        });
    }
    Ok(segment)
}

/// One night being edited.
#[derive(Debug)]
pub struct EditSession<R = ()> {
    config: EditorConfig,
    segments: Vec<Segment>,
    /// Restored by discard; replaced by open and save.
    baseline: SavedSession,
    tool: Option<ToolMode>,
    drag: DragMachine,
    dirty: bool,
    renderer: R,
}

impl EditSession<()> {
    /// Opens a session with no renderer attached.
    pub fn open<I>(window: Window, initial: I, config: EditorConfig) -> Self
    where
        I: IntoIterator<Item = Option<StageEvent>>,
    {
        Self::open_with_renderer(window, initial, config, ())
    }
}

impl<R: PreviewRenderer> EditSession<R> {
    pub fn open_with_renderer<I>(window: Window, initial: I, config: EditorConfig, renderer: R) -> Self
    where
        I: IntoIterator<Item = Option<StageEvent>>,
    {
        let segments = seed(&window, initial, config.default_label);
        tracing::debug!(
            bedtime = %window.start(),
            wake_time = %window.end(),
            segment_count = segments.len(),
            "edit session opened"
        );
        Self {
            config,
            baseline: SavedSession {
                window,
                segments: segments.clone(),
            },
            segments,
            tool: None,
            drag: DragMachine::new(window, config.grid_minutes),
            dirty: false,
            renderer,
        }
    }

    /// Opens a session from a stored entry.
    pub fn from_entry(entry: SleepEntry, config: EditorConfig, renderer: R) -> Result<Self, ConfigError> {
        let window = entry.window()?;
        Ok(Self::open_with_renderer(window, entry.stage_events, config, renderer))
    }

    pub const fn window(&self) -> &Window {
        self.drag.window()
    }

    /// Current list: the canonical one while idle.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub const fn tool(&self) -> Option<ToolMode> {
        self.tool
    }

    /// Chooses what the next drag does. Never touches segments.
    pub const fn select_tool(&mut self, tool: Option<ToolMode>) {
        self.tool = tool;
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Starts a drag at `fraction` of the timeline width with the selected tool.
    pub fn pointer_down(&mut self, fraction: f64) -> bool {
        self.drag.pointer_down(self.tool, fraction, &self.segments)
    }

    pub fn pointer_move(&mut self, fraction: f64) {
        if let Some(preview) = self.drag.pointer_move(fraction) {
            self.segments = preview.to_vec();
            self.renderer.preview(&self.segments);
        }
    }

    /// Ends the drag, consolidating what it painted or cleared.
    pub fn pointer_up(&mut self) {
        if let Some(committed) = self.drag.pointer_up() {
            self.segments = committed.segments;
            self.dirty |= committed.moved;
            self.renderer.commit(&self.segments);
        }
    }

    /// Leaving the timeline finishes the drag, same as releasing.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Removes every segment and switches to the clear tool.
    pub fn clear_all(&mut self) {
        self.drag.cancel();
        self.segments.clear();
        self.tool = Some(ToolMode::Clear);
        self.dirty = true;
        tracing::debug!("cleared all segments");
        self.renderer.commit(&self.segments);
    }

    /// Adopts a new window and starts over from a single default segment.
    ///
    /// Existing segments are not rescaled.
    pub fn on_window_edited(&mut self, window: Window) {
        self.drag.set_window(window);
        self.segments = vec![Segment::covering(&window, self.config.default_label)];
        self.dirty = true;
        tracing::debug!(
            bedtime = %window.start(),
            wake_time = %window.end(),
            "window edited, reseeded"
        );
        self.renderer.commit(&self.segments);
    }

    /// Edits the bedtime and wake clock times, keeping the bedtime date.
    pub fn edit_times(&mut self, bedtime: NaiveTime, wake: NaiveTime) -> Result<(), ConfigError> {
        let window = self.window().with_clock_times(bedtime, wake)?;
        self.on_window_edited(window);
        Ok(())
    }

    /// Finishes any drag, consolidates and returns the result to persist.
    pub fn save(&mut self) -> SavedSession {
        self.pointer_up();
        self.segments = consolidate(std::mem::take(&mut self.segments));
        let saved = SavedSession {
            window: *self.window(),
            segments: self.segments.clone(),
        };
        self.baseline = saved.clone();
        self.dirty = false;
        tracing::debug!(segment_count = saved.segments.len(), "session saved");
        saved
    }

    /// Drops all edits since the last open or save.
    pub fn discard(&mut self) {
        self.drag.set_window(self.baseline.window);
        self.segments = self.baseline.segments.clone();
        self.dirty = false;
        tracing::debug!("edits discarded");
        self.renderer.commit(&self.segments);
    }

    /// Placement of every segment on the timeline.
    pub fn layout(&self) -> Vec<(&Segment, SegmentGeometry)> {
        let window = self.window();
        self.segments.iter().map(|s| (s, window.geometry(s))).collect()
    }

    pub fn summary(&self) -> StageSummary {
        summarize(self.window(), &self.segments)
    }
}
