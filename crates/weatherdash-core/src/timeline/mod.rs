//! Timeline selection engine.
//!
//! This module provides:
//! - The fixed outer bounds of the timeline, computed once per process
//! - The selection store, the single writer of the committed selection
//! - Position <-> instant mapping for a percentage-based track

mod bounds;
mod mapping;
mod selection;
mod store;

pub use bounds::{BoundsAuthority, TimelineBounds};
pub use mapping::{position_from_offset, TrackMapping};
pub use selection::{Selection, SelectionMode};
pub use store::{SelectionStore, SubscriptionId};

use chrono::{DateTime, Utc};

/// A point in time with millisecond resolution.
pub type TimeInstant = DateTime<Utc>;

/// Drop sub-millisecond precision.
pub fn truncate_to_millis(t: DateTime<Utc>) -> TimeInstant {
    DateTime::from_timestamp_millis(t.timestamp_millis()).unwrap_or(t)
}

/// Build an instant from epoch milliseconds. `None` when chrono cannot
/// represent the value.
pub fn instant_from_millis(ms: i64) -> Option<TimeInstant> {
    DateTime::from_timestamp_millis(ms)
}
