//! Snapping timestamps to a fixed minute grid.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::ConfigError;

/// Spacing of the snapping grid, in minutes.
///
/// Only positive divisors of 60 are accepted, so every grid point keeps a
/// minute component that is a multiple of the grid size even after rolling
/// into the next hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GridSize(u32);

impl GridSize {
    /// Quarter-hour ticks.
    pub const QUARTER_HOUR: Self = Self(15);

    pub const fn new(minutes: u32) -> Result<Self, ConfigError> {
        if minutes == 0 || 60 % minutes != 0 {
            return Err(ConfigError::InvalidGrid { minutes });
        }
        Ok(Self(minutes))
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::QUARTER_HOUR
    }
}

impl TryFrom<u32> for GridSize {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GridSize> for u32 {
    fn from(grid: GridSize) -> Self {
        grid.0
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// Rounds `t` to the nearest grid point, halves rounding up.
///
/// Only the minute component takes part in rounding; seconds and below are
/// dropped, so 01:07:59 on a 15 minute grid snaps to 01:00. Rounding past
/// minute 59 rolls over into the next hour (and day) with ordinary calendar
/// arithmetic.
pub fn snap<Tz: TimeZone>(t: DateTime<Tz>, grid: GridSize) -> DateTime<Tz> {
    let step = grid.minutes();
    let minute = t.minute();
    let rounded = (minute + step / 2) / step * step;
    let past_hour = Duration::minutes(i64::from(minute))
        + Duration::seconds(i64::from(t.second()))
        + Duration::nanoseconds(i64::from(t.nanosecond()));
    t - past_hour + Duration::minutes(i64::from(rounded))
}
