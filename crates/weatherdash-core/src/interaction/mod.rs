//! Interaction surface: pointer gestures and field edits.
//!
//! Raw input is turned into a draft selection first. Drafts reach the
//! [`SelectionStore`](crate::timeline::SelectionStore) only at checkpoints:
//! pointer-up for drags, quiet-interval expiry for calendar and time fields.

mod debounce;
mod fields;
mod surface;

pub use debounce::Debouncer;
pub use fields::{parse_time_of_day, with_date, with_time_of_day};
pub use surface::{DraftSelection, GestureState, InteractionSurface};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One end of the selection, as a drag handle or as an edit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Start,
    End,
}

impl Handle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            other => Err(format!("unknown handle: {other}")),
        }
    }
}
