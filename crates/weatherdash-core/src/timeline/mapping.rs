//! Linear mapping between a percentage track and the timeline.
//!
//! `0.0` is the lower bound, `100.0` the upper bound. Both directions clamp
//! out-of-range input instead of failing.

use chrono::Duration;

use super::{TimeInstant, TimelineBounds};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackMapping {
    bounds: TimelineBounds,
}

impl TrackMapping {
    pub fn new(bounds: TimelineBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> TimelineBounds {
        self.bounds
    }

    /// Percentage position of `t`, after clamping it into the bounds.
    pub fn to_position(&self, t: TimeInstant) -> f64 {
        let t = self.bounds.clamp(t);
        let offset = (t - self.bounds.lower()).num_milliseconds() as f64;
        let span = self.bounds.span().num_milliseconds() as f64;
        offset / span * 100.0
    }

    /// Instant at percentage `position`, clamped into `[0, 100]`. NaN maps to
    /// the lower bound.
    pub fn to_instant(&self, position: f64) -> TimeInstant {
        let p = clamp_position(position);
        let span = self.bounds.span().num_milliseconds() as f64;
        let offset_ms = (p / 100.0 * span).round() as i64;
        self.bounds.clamp(self.bounds.lower() + Duration::milliseconds(offset_ms))
    }
}

/// Percentage position of a pointer `offset_px` into a track `width_px` wide.
pub fn position_from_offset(offset_px: f64, width_px: f64) -> f64 {
    if width_px.is_nan() || width_px <= 0.0 {
        return 0.0;
    }
    clamp_position(offset_px / width_px * 100.0)
}

fn clamp_position(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 100.0)
    }
}
