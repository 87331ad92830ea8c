//! Sleep stage labels as the single source of truth for stage strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The mutually exclusive stages a segment can be labeled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageLabel {
    Awake,
    Rem,
    Light,
    Deep,
}

impl StageLabel {
    /// Every label, in legend order.
    pub const ALL: [Self; 4] = [Self::Awake, Self::Rem, Self::Light, Self::Deep];

    /// String representation used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Awake => "awake",
            Self::Rem => "rem",
            Self::Light => "light",
            Self::Deep => "deep",
        }
    }
}

impl fmt::Display for StageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageLabel {
    type Err = UnknownStageLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awake" => Ok(Self::Awake),
            "rem" => Ok(Self::Rem),
            "light" => Ok(Self::Light),
            "deep" => Ok(Self::Deep),
            _ => Err(UnknownStageLabel(s.to_string())),
        }
    }
}

impl Serialize for StageLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StageLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown stage label strings.
#[derive(Debug, Clone)]
pub struct UnknownStageLabel(String);

impl fmt::Display for UnknownStageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sleep stage: {}", self.0)
    }
}

impl std::error::Error for UnknownStageLabel {}
