use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interaction::Handle;
use crate::region::RegionOfInterest;
use crate::timeline::{Selection, SelectionMode};

/// Every committed change and every gesture transition produces an Event.
/// The CLI prints them; a GUI shell would forward them to its views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StartCommitted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    EndCommitted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: SelectionMode,
        to: SelectionMode,
        end: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    RegionChanged {
        region: Option<RegionOfInterest>,
        at: DateTime<Utc>,
    },
    SelectionReset {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// Pointer went down on a handle or on the track.
    DragStarted {
        handle: Handle,
        position: f64,
        at: DateTime<Utc>,
    },
    /// Live feedback only; nothing has been committed.
    DraftMoved {
        handle: Handle,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// Pointer went up and the draft was written to the store.
    DragCommitted {
        handle: Handle,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A calendar or time field edit is waiting out its quiet interval.
    FieldEditStaged {
        field: Handle,
        value: DateTime<Utc>,
        settles_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    PlaybackStarted {
        index: usize,
        at: DateTime<Utc>,
    },
    PlaybackPaused {
        index: usize,
        at: DateTime<Utc>,
    },
    PlaybackAdvanced {
        index: usize,
        at: DateTime<Utc>,
    },
    PlaybackFinished {
        index: usize,
        at: DateTime<Utc>,
    },
    SelectionSnapshot {
        selection: Selection,
        at: DateTime<Utc>,
    },
}
