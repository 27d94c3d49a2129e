//! Gesture state machine over the selection track.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --pointer_down/track_press--> Dragging(handle) --pointer_up--> Idle
//!                                        |  ^
//!                                        +--+ pointer_move (draft only)
//! ```
//!
//! While dragging, every move recomputes the draft with the store's clamp
//! rules and nothing is committed. Pointer-up commits the draft at once.
//! There is no abort path: releasing the pointer always commits.
//!
//! Calendar and time-field edits are staged per field in a [`Debouncer`]
//! and committed by [`tick`](InteractionSurface::tick) once their quiet
//! interval elapses. A drag in progress holds those commits back.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::debounce::Debouncer;
use super::fields::{parse_time_of_day, with_date, with_time_of_day};
use super::Handle;
use crate::clock::SharedClock;
use crate::events::Event;
use crate::storage::InteractionConfig;
use crate::timeline::{SelectionMode, SelectionStore, TimeInstant, TimelineBounds, TrackMapping};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureState {
    Idle,
    Dragging(Handle),
}

/// Uncommitted start/end. Never written to the store except at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSelection {
    pub mode: SelectionMode,
    pub start: TimeInstant,
    pub end: TimeInstant,
}

impl DraftSelection {
    fn of(store: &SelectionStore) -> Self {
        Self {
            mode: store.mode(),
            start: store.start(),
            end: store.end(),
        }
    }

    /// Move one handle to `instant` (already inside the bounds) without
    /// letting it cross the other one.
    fn apply(&mut self, handle: Handle, instant: TimeInstant, bounds: &TimelineBounds) {
        match (self.mode, handle) {
            (SelectionMode::Single, _) => {
                self.start = instant;
                self.end = bounds.upper();
            }
            (SelectionMode::Range, Handle::Start) => self.start = instant.min(self.end),
            (SelectionMode::Range, Handle::End) => self.end = instant.max(self.start),
        }
    }
}

pub struct InteractionSurface {
    mapping: TrackMapping,
    clock: SharedClock,
    gesture: GestureState,
    draft: Option<DraftSelection>,
    start_field: Debouncer<TimeInstant>,
    end_field: Debouncer<TimeInstant>,
}

impl InteractionSurface {
    pub fn new(bounds: TimelineBounds, clock: SharedClock, quiet: Duration) -> Self {
        Self {
            mapping: TrackMapping::new(bounds),
            clock,
            gesture: GestureState::Idle,
            draft: None,
            start_field: Debouncer::new(quiet),
            end_field: Debouncer::new(quiet),
        }
    }

    pub fn from_config(bounds: TimelineBounds, clock: SharedClock, config: &InteractionConfig) -> Self {
        Self::new(bounds, clock, config.debounce())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> GestureState {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, GestureState::Dragging(_))
    }

    /// Global pointer events are only consumed while a drag holds capture.
    pub fn is_capturing_pointer(&self) -> bool {
        self.is_dragging()
    }

    pub fn draft(&self) -> Option<&DraftSelection> {
        self.draft.as_ref()
    }

    pub fn mapping(&self) -> &TrackMapping {
        &self.mapping
    }

    pub fn has_pending_edits(&self) -> bool {
        self.start_field.is_pending() || self.end_field.is_pending()
    }

    pub fn pending_edit(&self, field: Handle) -> Option<TimeInstant> {
        self.field(field).pending().copied()
    }

    /// Earliest moment a staged edit could settle; the host schedules its
    /// next [`tick`](Self::tick) for then.
    pub fn next_deadline(&self) -> Option<TimeInstant> {
        match (self.start_field.deadline(), self.end_field.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// What the track should show right now: the drag draft while a gesture
    /// is active, otherwise the committed selection with any staged field
    /// edits laid over it.
    pub fn displayed(&self, store: &SelectionStore) -> DraftSelection {
        if let Some(draft) = self.draft {
            return draft;
        }
        let mut view = DraftSelection::of(store);
        let bounds = store.bounds();
        if let Some(start) = self.start_field.pending() {
            view.apply(Handle::Start, *start, &bounds);
        }
        if view.mode == SelectionMode::Range {
            if let Some(end) = self.end_field.pending() {
                view.apply(Handle::End, *end, &bounds);
            }
        }
        view
    }

    // ── Pointer gestures ─────────────────────────────────────────────

    /// Pointer pressed on a handle. Single mode has only the start handle, so
    /// a press on the end handle is treated as a press on the start handle.
    pub fn pointer_down(&mut self, handle: Handle, position: f64, store: &SelectionStore) -> Event {
        let handle = match store.mode() {
            SelectionMode::Single => Handle::Start,
            SelectionMode::Range => handle,
        };
        let mut draft = self.draft.unwrap_or_else(|| DraftSelection::of(store));
        draft.apply(handle, self.mapping.to_instant(position), &store.bounds());
        self.draft = Some(draft);
        self.gesture = GestureState::Dragging(handle);
        tracing::debug!(%handle, position, "drag started");
        Event::DragStarted {
            handle,
            position,
            at: self.clock.now(),
        }
    }

    /// Pointer pressed on the bare track: the nearer handle jumps there and
    /// is dragged from then on. Equal distances pick the start handle.
    pub fn track_press(&mut self, position: f64, store: &SelectionStore) -> Event {
        let handle = match store.mode() {
            SelectionMode::Single => Handle::Start,
            SelectionMode::Range => {
                let to_start = (position - self.mapping.to_position(store.start())).abs();
                let to_end = (position - self.mapping.to_position(store.end())).abs();
                if to_start <= to_end {
                    Handle::Start
                } else {
                    Handle::End
                }
            }
        };
        self.pointer_down(handle, position, store)
    }

    /// Ignored unless a drag is in progress.
    pub fn pointer_move(&mut self, position: f64) -> Option<Event> {
        let GestureState::Dragging(handle) = self.gesture else {
            return None;
        };
        let bounds = self.mapping.bounds();
        let instant = self.mapping.to_instant(position);
        let draft = self.draft.as_mut()?;
        draft.apply(handle, instant, &bounds);
        tracing::trace!(%handle, position, start = %draft.start, end = %draft.end, "draft moved");
        Some(Event::DraftMoved {
            handle,
            start: draft.start,
            end: draft.end,
            at: self.clock.now(),
        })
    }

    /// Release: commit the draft immediately and return to Idle. A staged
    /// field edit for the dragged handle is dropped, since the drag is newer.
    pub fn pointer_up(&mut self, store: &mut SelectionStore) -> Option<Event> {
        let GestureState::Dragging(handle) = self.gesture else {
            return None;
        };
        self.gesture = GestureState::Idle;
        let draft = self.draft.take()?;
        match handle {
            Handle::Start => store.set_start(draft.start),
            Handle::End => store.set_end(draft.end),
        };
        if self.field_mut(handle).cancel().is_some() {
            tracing::debug!(%handle, "staged field edit superseded by drag");
        }
        tracing::debug!(%handle, start = %store.start(), end = %store.end(), "drag committed");
        Some(Event::DragCommitted {
            handle,
            start: store.start(),
            end: store.end(),
            at: self.clock.now(),
        })
    }

    // ── Field edits ──────────────────────────────────────────────────

    /// Calendar pick: keep the field's time of day, change its date.
    pub fn edit_date(&mut self, field: Handle, date: NaiveDate, store: &SelectionStore) -> Option<Event> {
        let base = self.field_base(field, store)?;
        self.stage(field, with_date(base, date), store)
    }

    /// Typed `HH:MM`: keep the field's date, change its time of day.
    /// Malformed text is ignored.
    pub fn edit_time(&mut self, field: Handle, text: &str, store: &SelectionStore) -> Option<Event> {
        let Some(time) = parse_time_of_day(text) else {
            tracing::debug!(%field, text, "ignoring malformed time");
            return None;
        };
        let base = self.field_base(field, store)?;
        self.stage(field, with_time_of_day(base, time), store)
    }

    /// Commit every staged edit whose quiet interval has elapsed. Does
    /// nothing while a drag is in progress; the edits stay staged.
    pub fn tick(&mut self, store: &mut SelectionStore) -> Vec<Event> {
        if self.is_dragging() {
            return Vec::new();
        }
        let now = self.clock.now();
        let start = self.start_field.take_settled(now);
        let end = self.end_field.take_settled(now);

        // Widening past the current end: move the end first so the new
        // start is not clamped against the stale one.
        let end_first = matches!((start, end), (Some(s), Some(_)) if s > store.end());

        let mut events = Vec::new();
        if end_first {
            events.extend(end.and_then(|e| store.set_end(e)));
        }
        events.extend(start.and_then(|s| store.set_start(s)));
        if !end_first {
            events.extend(end.and_then(|e| store.set_end(e)));
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn field(&self, field: Handle) -> &Debouncer<TimeInstant> {
        match field {
            Handle::Start => &self.start_field,
            Handle::End => &self.end_field,
        }
    }

    fn field_mut(&mut self, field: Handle) -> &mut Debouncer<TimeInstant> {
        match field {
            Handle::Start => &mut self.start_field,
            Handle::End => &mut self.end_field,
        }
    }

    /// The value an edit starts from: the staged one, else the committed one.
    /// `None` for the end field in Single mode, which has no editor.
    fn field_base(&self, field: Handle, store: &SelectionStore) -> Option<TimeInstant> {
        if field == Handle::End && store.mode() == SelectionMode::Single {
            tracing::debug!("end field edit ignored in single mode");
            return None;
        }
        let committed = match field {
            Handle::Start => store.start(),
            Handle::End => store.end(),
        };
        Some(self.pending_edit(field).unwrap_or(committed))
    }

    fn stage(&mut self, field: Handle, value: TimeInstant, store: &SelectionStore) -> Option<Event> {
        let bounds = store.bounds();
        let value = bounds.clamp(value);
        let value = match (store.mode(), field) {
            (SelectionMode::Range, Handle::End) => {
                let start = self.pending_edit(Handle::Start).unwrap_or(store.start());
                value.max(start)
            }
            _ => value,
        };
        let now = self.clock.now();
        let settles_at = self.field_mut(field).push(value, now);
        tracing::debug!(%field, %value, %settles_at, "field edit staged");
        Some(Event::FieldEditStaged {
            field,
            value,
            settles_at,
            at: now,
        })
    }
}
