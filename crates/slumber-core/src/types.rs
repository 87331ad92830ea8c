//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::stage::StageLabel;
use crate::window::Window;

/// Prefix marking ids minted during an edit session.
const PROVISIONAL_PREFIX: &str = "temp-";

/// Configuration errors, fatal before any interaction starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The window does not span at least one whole minute.
    #[error("window must end at least one minute after it starts ({start} .. {end})")]
    EmptyWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The snapping grid is zero or does not divide an hour.
    #[error("grid size must be a positive divisor of 60 minutes, got {minutes}")]
    InvalidGrid { minutes: u32 },
}

/// Validation errors for segment data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The segment does not cover any time.
    #[error("segment must end after it starts ({start} .. {end})")]
    EmptySegment {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The segment reaches outside the editable window.
    #[error("segment {start} .. {end} lies outside the window")]
    OutOfWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Identity of a segment, stable only within one edit session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SegmentId(String);

impl SegmentId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty {
                field: "segment ID",
            });
        }
        Ok(Self(id))
    }

    /// Mints a fresh id for a segment that has never been persisted.
    pub fn provisional() -> Self {
        Self(format!("{PROVISIONAL_PREFIX}{}", Uuid::new_v4()))
    }

    /// Whether this id was minted locally and still needs a backend id.
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SegmentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SegmentId> for String {
    fn from(id: SegmentId) -> Self {
        id.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SegmentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A labeled, time-bounded piece of the sleep window.
///
/// `start < end` holds for every value of this type. The duration is always
/// derived from the bounds, so it can never drift out of sync with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    id: SegmentId,
    label: StageLabel,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Segment {
    /// Creates a segment, rejecting empty or inverted bounds.
    pub fn new(
        id: SegmentId,
        label: StageLabel,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::EmptySegment { start, end });
        }
        Ok(Self {
            id,
            label,
            start,
            end,
        })
    }

    /// Creates a segment with a freshly minted provisional id.
    pub fn provisional(
        label: StageLabel,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Self::new(SegmentId::provisional(), label, start, end)
    }

    /// Provisional segment spanning the whole window.
    pub fn covering(window: &Window, label: StageLabel) -> Self {
        Self {
            id: SegmentId::provisional(),
            label,
            start: window.start(),
            end: window.end(),
        }
    }

    pub const fn id(&self) -> &SegmentId {
        &self.id
    }

    pub const fn label(&self) -> StageLabel {
        self.label
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the segment in whole seconds.
    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Whether the segment shares any time with `[start, end)`.
    ///
    /// An empty or inverted range shares no time with anything.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start.max(start) < self.end.min(end)
    }

    /// Same label and bounds, ignoring identity.
    pub fn same_span(&self, other: &Self) -> bool {
        self.label == other.label && self.start == other.start && self.end == other.end
    }

    /// Copy of this segment with new bounds, keeping its id and label.
    ///
    /// Callers must pass `start < end`.
    pub(crate) fn with_bounds(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "clipped segment must stay non-empty");
        Self {
            id: self.id.clone(),
            label: self.label,
            start,
            end,
        }
    }

    /// Fresh-id segment with the given bounds and this segment's label.
    pub(crate) fn split_off(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "split segment must stay non-empty");
        Self {
            id: SegmentId::provisional(),
            label: self.label,
            start,
            end,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}..{}",
            self.label,
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Compares two lists by label and bounds only.
pub fn same_coverage(a: &[Segment], b: &[Segment]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_span(y))
}
