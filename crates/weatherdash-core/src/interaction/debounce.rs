//! Cancellable delayed commit.
//!
//! Each [`push`](Debouncer::push) replaces the pending value and restarts
//! the quiet interval, so only the last value of a burst survives. Nothing
//! runs in the background: the owner asks [`take_settled`](Debouncer::take_settled)
//! whenever its event loop wakes up.

use chrono::{DateTime, Duration, Utc};

use crate::timeline::TimeInstant;

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: TimeInstant,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Stage `value`, cancelling whatever was pending. Returns the new
    /// deadline, saturated at the latest representable instant.
    pub fn push(&mut self, value: T, now: TimeInstant) -> TimeInstant {
        let deadline = now
            .checked_add_signed(self.quiet)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.pending = Some(Pending { value, deadline });
        deadline
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    pub fn deadline(&self) -> Option<TimeInstant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_settled(&self, now: TimeInstant) -> bool {
        self.pending.as_ref().is_some_and(|p| now >= p.deadline)
    }

    /// Hand out the value once its quiet interval has fully elapsed.
    pub fn take_settled(&mut self, now: TimeInstant) -> Option<T> {
        if self.is_settled(now) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}
