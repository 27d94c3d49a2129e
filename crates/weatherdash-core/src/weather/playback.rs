//! Playback cursor over a fetched series.
//!
//! Like the rest of the core this is a clock-driven state machine with no
//! internal thread: the host calls [`tick`](PlaybackEngine::tick) and the
//! cursor advances one point per elapsed step.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Playing -> (Paused | Finished)
//! Paused -> Playing, Finished -> Playing (restarts from the first point)
//! ```

use std::ops::Range;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::clock::SharedClock;
use crate::events::Event;
use crate::storage::PlaybackConfig;
use crate::timeline::TimeInstant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Finished,
}

pub struct PlaybackEngine {
    clock: SharedClock,
    len: usize,
    step: Duration,
    window_size: usize,
    state: PlaybackState,
    index: usize,
    /// When the cursor last moved (or playback started). Only set while
    /// Playing.
    last_advance: Option<TimeInstant>,
}

impl PlaybackEngine {
    pub fn new(len: usize, config: &PlaybackConfig, clock: SharedClock) -> Self {
        Self {
            clock,
            len,
            step: config.step(),
            window_size: config.window_size.max(1),
            state: PlaybackState::Idle,
            index: 0,
            last_advance: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices on screen: the cursor and up to `window_size - 1` points
    /// before it.
    pub fn window(&self) -> Range<usize> {
        if self.len == 0 {
            return 0..0;
        }
        let end = self.index + 1;
        end.saturating_sub(self.window_size)..end
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// A new series arrived; rewind and stop.
    pub fn load(&mut self, len: usize) {
        self.len = len;
        self.replay();
    }

    pub fn play(&mut self) -> Option<Event> {
        if self.len == 0 || self.state == PlaybackState::Playing {
            return None;
        }
        if self.index + 1 >= self.len {
            self.index = 0;
        }
        let now = self.clock.now();
        self.state = PlaybackState::Playing;
        self.last_advance = Some(now);
        Some(Event::PlaybackStarted {
            index: self.index,
            at: now,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        self.state = PlaybackState::Paused;
        self.last_advance = None;
        Some(Event::PlaybackPaused {
            index: self.index,
            at: self.clock.now(),
        })
    }

    /// Back to the first point, stopped.
    pub fn replay(&mut self) {
        self.state = PlaybackState::Idle;
        self.index = 0;
        self.last_advance = None;
    }

    /// Call periodically. Advances one point per full step elapsed since the
    /// last move; stepping past the last point finishes playback.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let last = self.last_advance?;
        let now = self.clock.now();
        let step_ms = self.step.num_milliseconds().max(1);
        let steps = (now - last).num_milliseconds() / step_ms;
        if steps <= 0 {
            return None;
        }
        self.last_advance = Some(last + Duration::milliseconds(steps * step_ms));

        for _ in 0..steps {
            if self.index + 1 >= self.len {
                self.state = PlaybackState::Finished;
                self.last_advance = None;
                return Some(Event::PlaybackFinished {
                    index: self.index,
                    at: now,
                });
            }
            self.index += 1;
        }
        Some(Event::PlaybackAdvanced {
            index: self.index,
            at: now,
        })
    }
}
