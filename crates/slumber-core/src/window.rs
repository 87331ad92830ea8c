//! The editable bedtime-to-wake window and its linear time mapping.
//!
//! Positions on the rendered timeline are expressed as fractions of the
//! window: `0.0` is bedtime and `1.0` is wake time. The window rejects a zero
//! length at construction, so none of the mapping functions need to guard
//! against division by zero.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ConfigError, Segment};

/// A validated `[start, end)` range spanning at least one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow", into = "RawWindow")]
pub struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct RawWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawWindow> for Window {
    type Error = ConfigError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<Window> for RawWindow {
    fn from(window: Window) -> Self {
        Self {
            start: window.start,
            end: window.end,
        }
    }
}

/// Horizontal placement of a segment, as fractions of the window width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometry {
    pub left: f64,
    pub width: f64,
}

/// An hourly marker on the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTick {
    pub time: DateTime<Utc>,
    pub offset: f64,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ConfigError> {
        if end - start < Duration::minutes(1) {
            return Err(ConfigError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Rebuilds the window from bedtime/wake clock times on the current
    /// bedtime date. A wake time earlier than the bedtime falls on the next day.
    pub fn with_clock_times(&self, bedtime: NaiveTime, wake: NaiveTime) -> Result<Self, ConfigError> {
        let date = self.start.date_naive();
        let start = date.and_time(bedtime).and_utc();
        let mut end = date.and_time(wake).and_utc();
        if end < start {
            end += Duration::days(1);
        }
        Self::new(start, end)
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whole minutes between bedtime and wake time.
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Position of `t` as a fraction of the window. Not clamped.
    #[allow(clippy::cast_precision_loss, reason = "window spans fit easily in f64")]
    pub fn to_fraction(&self, t: DateTime<Utc>) -> f64 {
        let offset = (t - self.start).num_milliseconds() as f64;
        offset / self.duration().num_milliseconds() as f64
    }

    /// Inverse of [`to_fraction`](Self::to_fraction), to the nearest millisecond.
    ///
    /// Fractions outside `[0, 1]` are pinned to the window edges; NaN maps to
    /// bedtime.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        reason = "window spans fit easily in f64"
    )]
    pub fn fraction_to_time(&self, fraction: f64) -> DateTime<Utc> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let total = self.duration().num_milliseconds() as f64;
        self.start + Duration::milliseconds((fraction * total).round() as i64)
    }

    /// Left offset and width of a segment. Callers pass in-window segments.
    pub fn geometry(&self, segment: &Segment) -> SegmentGeometry {
        let left = self.to_fraction(segment.start());
        let right = self.to_fraction(segment.end());
        SegmentGeometry {
            left,
            width: right - left,
        }
    }

    /// Pulls `t` back inside `[start, end]`.
    pub fn clamp(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        t.clamp(self.start, self.end)
    }

    /// Whether `[start, end]` lies entirely inside the window.
    pub fn contains_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start >= self.start && end <= self.end
    }

    /// One tick per whole hour after bedtime, bedtime included.
    pub fn hour_ticks(&self) -> Vec<AxisTick> {
        (0..=self.duration_minutes() / 60)
            .map(|hour| {
                let time = self.start + Duration::hours(hour);
                AxisTick {
                    time,
                    offset: self.to_fraction(time),
                }
            })
            .collect()
    }
}
