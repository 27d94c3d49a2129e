//! Read-only views derived from the selection.
//!
//! Nothing here mutates the store. Views are recomputed from a
//! [`Selection`] (or the surface's draft during a gesture) every time they
//! are needed.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::interaction::DraftSelection;
use crate::timeline::{
    Selection, SelectionMode, SelectionStore, SubscriptionId, TimeInstant, TimelineBounds,
    TrackMapping,
};

const DATE_TIME_FORMAT: &str = "%b %-d, %Y, %H:%M";
const MS_PER_HOUR: f64 = 3_600_000.0;

/// `"{h}h"` under a day, `"{d}d {h}h"` from 24 hours on. Hours are rounded
/// to the nearest whole hour first.
pub fn format_duration(start: TimeInstant, end: TimeInstant) -> String {
    let ms = (end - start).num_milliseconds() as f64;
    let hours = (ms / MS_PER_HOUR).round() as i64;
    if hours >= 24 {
        format!("{}d {}h", hours / 24, hours % 24)
    } else {
        format!("{hours}h")
    }
}

pub fn format_instant(t: TimeInstant) -> String {
    t.format(DATE_TIME_FORMAT).to_string()
}

/// Highlighted stretch of the track between the two handles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeHighlight {
    pub left: f64,
    pub width: f64,
}

/// Percentage positions of everything drawn on the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackView {
    pub start: f64,
    pub end: f64,
    /// Only in Range mode.
    pub highlight: Option<RangeHighlight>,
    /// "Now" marker. A now past the upper bound sits at 100.
    pub now_marker: f64,
}

impl TrackView {
    pub fn derive(mapping: &TrackMapping, view: &DraftSelection, now: TimeInstant) -> Self {
        let start = mapping.to_position(view.start);
        let (end, highlight) = match view.mode {
            SelectionMode::Single => (mapping.to_position(mapping.bounds().upper()), None),
            SelectionMode::Range => {
                let end = mapping.to_position(view.end);
                let highlight = RangeHighlight {
                    left: start.min(end),
                    width: (end - start).abs(),
                };
                (end, Some(highlight))
            }
        };
        Self {
            start,
            end,
            highlight,
            now_marker: mapping.to_position(now),
        }
    }
}

/// Text of the selection display panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub title: String,
    pub start: String,
    /// `None` in Single mode, where the end is implicit.
    pub end: Option<String>,
    pub duration: String,
}

impl SelectionSummary {
    pub fn from_selection(selection: &Selection, bounds: &TimelineBounds) -> Self {
        match selection.mode {
            SelectionMode::Single => Self {
                title: "Selected Point".into(),
                start: format_instant(selection.start),
                end: None,
                duration: format!(
                    "Duration to timeline end: {}",
                    format_duration(selection.start, bounds.upper())
                ),
            },
            SelectionMode::Range => Self {
                title: "Selected Range".into(),
                start: format_instant(selection.start),
                end: Some(format_instant(selection.end)),
                duration: format_duration(selection.start, selection.end),
            },
        }
    }
}

/// A display panel kept in sync with the store through a subscription.
pub struct SelectionPanel {
    summary: Rc<RefCell<SelectionSummary>>,
    renders: Rc<RefCell<usize>>,
    subscription: SubscriptionId,
}

impl SelectionPanel {
    pub fn attach(store: &mut SelectionStore) -> Self {
        let bounds = store.bounds();
        let summary = Rc::new(RefCell::new(SelectionSummary::from_selection(
            store.selection(),
            &bounds,
        )));
        let renders = Rc::new(RefCell::new(1));

        let sink = summary.clone();
        let counter = renders.clone();
        let subscription = store.subscribe(move |selection| {
            *sink.borrow_mut() = SelectionSummary::from_selection(selection, &bounds);
            *counter.borrow_mut() += 1;
        });

        Self {
            summary,
            renders,
            subscription,
        }
    }

    pub fn summary(&self) -> SelectionSummary {
        self.summary.borrow().clone()
    }

    pub fn render_count(&self) -> usize {
        *self.renders.borrow()
    }

    pub fn detach(self, store: &mut SelectionStore) -> bool {
        store.unsubscribe(self.subscription)
    }
}
