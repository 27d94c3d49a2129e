//! Injected time sources.
//!
//! Every component that needs "now" receives a [`SharedClock`] at
//! construction instead of calling `Utc::now()` itself, so bounds, resets
//! and debounce deadlines can be driven deterministically.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::timeline::{truncate_to_millis, TimeInstant};

pub trait Clock: Send + Sync {
    fn now(&self) -> TimeInstant;
}

pub type SharedClock = Arc<dyn Clock>;

/// Wall clock, truncated to millisecond resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeInstant {
        truncate_to_millis(Utc::now())
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and by the CLI script replayer, where `tick <ms>` stands in
/// for real elapsed time. Advancing saturates at the representable range
/// instead of wrapping.
#[derive(Debug)]
pub struct ManualClock {
    epoch_ms: AtomicI64,
}

fn clamp_millis(ms: i64) -> i64 {
    ms.clamp(
        DateTime::<Utc>::MIN_UTC.timestamp_millis(),
        DateTime::<Utc>::MAX_UTC.timestamp_millis(),
    )
}

impl ManualClock {
    pub fn new(start: TimeInstant) -> Self {
        Self {
            epoch_ms: AtomicI64::new(clamp_millis(start.timestamp_millis())),
        }
    }

    pub fn shared(start: TimeInstant) -> Arc<Self> {
        Arc::new(Self::new(start))
    }

    pub fn advance(&self, by: Duration) {
        self.advance_ms(by.num_milliseconds());
    }

    pub fn advance_ms(&self, ms: i64) {
        // The closure never returns None, so the update always lands.
        let _ = self
            .epoch_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                Some(clamp_millis(cur.saturating_add(ms)))
            });
    }

    pub fn set(&self, at: TimeInstant) {
        self.epoch_ms
            .store(clamp_millis(at.timestamp_millis()), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimeInstant {
        let ms = self.epoch_ms.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}
