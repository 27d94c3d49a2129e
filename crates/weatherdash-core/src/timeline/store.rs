//! The single source of truth for the committed selection.
//!
//! Every mutator clamps its input, re-checks the full invariant set and then
//! notifies subscribers synchronously, in registration order, before
//! returning. A subscriber therefore never observes a half-applied change.
//!
//! ## Invariants after every mutator
//!
//! ```text
//! lower <= start <= end <= upper
//! mode == Single  =>  end == upper
//! ```
//!
//! ## Re-entrancy
//!
//! Listeners must not mutate the store from inside their callback. With a
//! plain `&mut SelectionStore` the borrow checker forbids it; when the store
//! is shared through `Rc<RefCell<_>>` the attempt panics on the second
//! borrow. Supporting it is not a goal.

use chrono::Duration;

use super::{
    instant_from_millis, truncate_to_millis, BoundsAuthority, Selection, SelectionMode,
    TimeInstant, TimelineBounds,
};
use crate::clock::SharedClock;
use crate::events::Event;
use crate::region::RegionOfInterest;
use crate::storage::{TimelineConfig, WeatherConfig};
use crate::weather::WeatherQuery;

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&Selection)>;

pub struct SelectionStore {
    bounds: TimelineBounds,
    clock: SharedClock,
    /// How far past `start` the end is pushed when Range mode opens on an
    /// empty interval.
    range_extension: Duration,
    selection: Selection,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl SelectionStore {
    /// Starts in Single mode at `clamp(now)`, with no region.
    pub fn new(bounds: TimelineBounds, clock: SharedClock, range_extension: Duration) -> Self {
        let start = bounds.clamp(clock.now());
        Self {
            bounds,
            clock,
            range_extension,
            selection: Selection {
                mode: SelectionMode::Single,
                start,
                end: bounds.upper(),
                region: None,
            },
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn from_config(authority: &BoundsAuthority, clock: SharedClock, config: &TimelineConfig) -> Self {
        Self::new(authority.get_bounds(), clock, config.range_extension())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn bounds(&self) -> TimelineBounds {
        self.bounds
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn snapshot(&self) -> Selection {
        self.selection.clone()
    }

    pub fn mode(&self) -> SelectionMode {
        self.selection.mode
    }

    pub fn start(&self) -> TimeInstant {
        self.selection.start
    }

    pub fn end(&self) -> TimeInstant {
        self.selection.end
    }

    pub fn region(&self) -> Option<&RegionOfInterest> {
        self.selection.region.as_ref()
    }

    /// The key the weather collaborator fetches with, if a region is drawn.
    pub fn weather_query(&self) -> Option<WeatherQuery> {
        WeatherQuery::from_selection(&self.selection)
    }

    pub fn snapshot_event(&self) -> Event {
        Event::SelectionSnapshot {
            selection: self.snapshot(),
            at: self.clock.now(),
        }
    }

    /// Archive URL for the current selection, if a region is drawn.
    pub fn weather_url(&self, config: &WeatherConfig) -> Option<String> {
        self.weather_query()
            .and_then(|q| q.archive_url(config).ok())
            .map(|u| u.to_string())
    }

    // ── Mutators ─────────────────────────────────────────────────────

    /// Move the start. In Range mode the start cannot pass the end.
    pub fn set_start(&mut self, instant: TimeInstant) -> Option<Event> {
        let ceiling = match self.selection.mode {
            SelectionMode::Range => self.selection.end,
            SelectionMode::Single => self.bounds.upper(),
        };
        let start = truncate_to_millis(instant).max(self.bounds.lower()).min(ceiling);
        self.selection.start = start;
        tracing::debug!(%start, mode = %self.selection.mode, "start committed");
        self.publish(Event::StartCommitted {
            start,
            end: self.selection.end,
            at: self.clock.now(),
        })
    }

    /// Move the end, never before the start.
    ///
    /// In Single mode the end is derived, not stored: the call is ignored
    /// and returns `None`. Callers may invoke it defensively.
    pub fn set_end(&mut self, instant: TimeInstant) -> Option<Event> {
        if self.selection.mode == SelectionMode::Single {
            tracing::debug!("set_end ignored in single mode");
            return None;
        }
        let end = truncate_to_millis(instant)
            .max(self.selection.start)
            .min(self.bounds.upper());
        self.selection.end = end;
        tracing::debug!(%end, "end committed");
        self.publish(Event::EndCommitted {
            start: self.selection.start,
            end,
            at: self.clock.now(),
        })
    }

    /// [`set_start`](Self::set_start) from epoch milliseconds; unrepresentable
    /// values are ignored.
    pub fn set_start_millis(&mut self, ms: i64) -> Option<Event> {
        let instant = instant_from_millis(ms)?;
        self.set_start(instant)
    }

    /// [`set_end`](Self::set_end) from epoch milliseconds; unrepresentable
    /// values are ignored.
    pub fn set_end_millis(&mut self, ms: i64) -> Option<Event> {
        let instant = instant_from_millis(ms)?;
        self.set_end(instant)
    }

    /// Switch mode and resynchronise the end.
    ///
    /// - Single -> Range: if `end <= start`, the end moves to
    ///   `start + range_extension` (capped at the upper bound); otherwise it
    ///   stays where it is.
    /// - Range -> Single: the end is pinned to the upper bound.
    ///
    /// Setting the current mode again is a no-op.
    pub fn set_mode(&mut self, mode: SelectionMode) -> Option<Event> {
        let from = self.selection.mode;
        if from == mode {
            return None;
        }
        self.selection.mode = mode;
        match mode {
            SelectionMode::Range => {
                if self.selection.end <= self.selection.start {
                    let upper = self.bounds.upper();
                    self.selection.end = self
                        .selection
                        .start
                        .checked_add_signed(self.range_extension)
                        .map_or(upper, |end| end.min(upper));
                }
            }
            SelectionMode::Single => {
                self.selection.end = self.bounds.upper();
            }
        }
        tracing::debug!(%from, to = %mode, end = %self.selection.end, "mode changed");
        self.publish(Event::ModeChanged {
            from,
            to: mode,
            end: self.selection.end,
            at: self.clock.now(),
        })
    }

    pub fn toggle_mode(&mut self) -> Option<Event> {
        self.set_mode(self.selection.mode.toggled())
    }

    /// Replace the region wholesale. A region without a centroid cannot key
    /// anything and is stored as "no region".
    pub fn set_region_of_interest(&mut self, region: Option<RegionOfInterest>) -> Option<Event> {
        let region = region.filter(|r| r.centroid.is_some());
        self.selection.region = region;
        tracing::debug!(has_region = self.selection.region.is_some(), "region replaced");
        self.publish(Event::RegionChanged {
            region: self.selection.region.clone(),
            at: self.clock.now(),
        })
    }

    pub fn clear_region(&mut self) -> Option<Event> {
        self.set_region_of_interest(None)
    }

    /// Back to "now, extended to the timeline end", whatever the mode.
    pub fn reset(&mut self) -> Option<Event> {
        self.selection.start = self.bounds.clamp(self.clock.now());
        self.selection.end = self.bounds.upper();
        tracing::debug!(start = %self.selection.start, "selection reset");
        self.publish(Event::SelectionReset {
            start: self.selection.start,
            end: self.selection.end,
            at: self.clock.now(),
        })
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Register a listener, called once per committed mutation with the new
    /// selection.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Selection) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not (or no longer) subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        let removed = self.listeners.len() != before;
        if !removed {
            tracing::warn!(id, "unsubscribe for unknown subscription");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn publish(&mut self, event: Event) -> Option<Event> {
        debug_assert!(
            self.selection.is_consistent_with(&self.bounds),
            "selection invariant broken: {:?}",
            self.selection
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.selection);
        }
        Some(event)
    }
}
