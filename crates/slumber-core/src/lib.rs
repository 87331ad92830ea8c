//! Core logic for editing a night's sleep stages on a timeline.
//!
//! This crate contains:
//! - Window geometry: mapping between instants and timeline fractions
//! - Snapping: rounding pointer positions onto a minute grid
//! - Segment store: paint, clear and consolidate over a canonical list
//! - Drag handling: turning pointer gestures into segment edits
//! - Edit sessions: dirty tracking, save and discard around the above

pub mod drag;
pub mod entry;
pub mod session;
mod snap;
pub mod stage;
pub mod store;
mod summary;
pub mod types;
pub mod window;

pub use drag::{Committed, DragMachine, ToolMode};
pub use entry::{SleepEntry, StageEvent};
pub use session::{EditSession, EditorConfig, PreviewRenderer, SavedSession, recorded, seed};
pub use snap::{GridSize, snap};
pub use stage::{StageLabel, UnknownStageLabel};
pub use store::{TimeRange, clear, consolidate, is_canonical, paint};
pub use summary::{StageSummary, summarize};
pub use types::{ConfigError, Segment, SegmentId, ValidationError, same_coverage};
pub use window::{AxisTick, SegmentGeometry, Window};
