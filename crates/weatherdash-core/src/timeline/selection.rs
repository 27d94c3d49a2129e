use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{TimeInstant, TimelineBounds};
use crate::region::RegionOfInterest;

/// Whether the end of the selection is user-controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// One instant; the end is pinned to the timeline's upper bound.
    Single,
    /// An explicit start..end interval.
    Range,
}

impl SelectionMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Single => Self::Range,
            Self::Range => Self::Single,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "range" => Ok(Self::Range),
            other => Err(format!("unknown selection mode: {other}")),
        }
    }
}

/// The committed selection. Only [`SelectionStore`](super::SelectionStore)
/// produces these; everyone else sees snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub mode: SelectionMode,
    pub start: TimeInstant,
    pub end: TimeInstant,
    pub region: Option<RegionOfInterest>,
}

impl Selection {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks every invariant a committed selection must satisfy.
    pub fn is_consistent_with(&self, bounds: &TimelineBounds) -> bool {
        let ordered = bounds.contains(self.start) && bounds.contains(self.end) && self.start <= self.end;
        match self.mode {
            SelectionMode::Single => ordered && self.end == bounds.upper(),
            SelectionMode::Range => ordered,
        }
    }
}
