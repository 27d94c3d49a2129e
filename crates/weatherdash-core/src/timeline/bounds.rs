//! The fixed outer extent of the timeline.
//!
//! Bounds trail the moment they are first requested: the lower bound sits
//! `window_days` back and the upper bound `trailing_margin_days` back, the
//! margin covering upstream weather data that is not finalised yet. Once
//! computed they never move, so track positions stay stable while the user
//! interacts.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{truncate_to_millis, TimeInstant};
use crate::clock::SharedClock;
use crate::error::{ConfigError, ValidationError};
use crate::storage::TimelineConfig;

/// `lower < upper`, both at millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineBounds {
    lower: TimeInstant,
    upper: TimeInstant,
}

impl TimelineBounds {
    pub fn new(lower: TimeInstant, upper: TimeInstant) -> Result<Self, ValidationError> {
        let lower = truncate_to_millis(lower);
        let upper = truncate_to_millis(upper);
        if lower >= upper {
            return Err(ValidationError::InvalidTimeRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> TimeInstant {
        self.lower
    }

    pub fn upper(&self) -> TimeInstant {
        self.upper
    }

    pub fn span(&self) -> Duration {
        self.upper - self.lower
    }

    pub fn contains(&self, t: TimeInstant) -> bool {
        self.lower <= t && t <= self.upper
    }

    /// Clamp into `[lower, upper]`. Idempotent.
    pub fn clamp(&self, t: TimeInstant) -> TimeInstant {
        truncate_to_millis(t).clamp(self.lower, self.upper)
    }
}

/// Hands out the process-wide [`TimelineBounds`].
///
/// Bounds are derived from the clock on the first call to
/// [`get_bounds`](Self::get_bounds) and cached; no later call consults the
/// clock again.
pub struct BoundsAuthority {
    clock: SharedClock,
    window: Duration,
    margin: Duration,
    bounds: OnceLock<TimelineBounds>,
}

impl BoundsAuthority {
    /// Validates the window up front so the lazy computation cannot fail.
    pub fn new(clock: SharedClock, config: &TimelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            clock,
            window: config.window(),
            margin: config.trailing_margin(),
            bounds: OnceLock::new(),
        })
    }

    /// An authority whose bounds are already decided.
    pub fn with_bounds(clock: SharedClock, bounds: TimelineBounds) -> Self {
        Self {
            clock,
            window: bounds.span(),
            margin: Duration::zero(),
            bounds: OnceLock::from(bounds),
        }
    }

    pub fn get_bounds(&self) -> TimelineBounds {
        *self.bounds.get_or_init(|| {
            let now = truncate_to_millis(self.clock.now());
            // Near the start of representable time the window is kept whole
            // by lifting the upper bound instead of collapsing the span.
            let span = self.window - self.margin;
            let floor = DateTime::<Utc>::MIN_UTC
                .checked_add_signed(span)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            let upper = now
                .checked_sub_signed(self.margin)
                .unwrap_or(floor)
                .max(floor);
            let bounds = TimelineBounds {
                lower: upper.checked_sub_signed(span).unwrap_or(DateTime::<Utc>::MIN_UTC),
                upper,
            };
            tracing::debug!(lower = %bounds.lower, upper = %bounds.upper, "timeline bounds fixed");
            bounds
        })
    }

    pub fn is_fixed(&self) -> bool {
        self.bounds.get().is_some()
    }
}
