//! Last-emission clock
//!
//! Remembers when the most recent line was emitted so the next one can report
//! the elapsed time (`+12ms`). One clock is shared by every logger in the
//! process; a private clock can be handed to a logger through the builder.

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::time::{Duration, Instant};

static GLOBAL_CLOCK: Lazy<EmissionClock> = Lazy::new(EmissionClock::new);

#[derive(Debug, Clone, Default)]
pub struct EmissionClock {
    last: Arc<Mutex<Option<Instant>>>,
}

impl EmissionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide clock
    pub fn global() -> Self {
        GLOBAL_CLOCK.clone()
    }

    /// Lock the clock. The guard is held while a line is formatted and
    /// written, so clock updates follow emission order.
    pub fn lock(&self) -> ClockGuard<'_> {
        ClockGuard {
            last: self.last.lock(),
        }
    }

    /// Time of the last emission, if any
    pub fn last_emission(&self) -> Option<Instant> {
        *self.last.lock()
    }

    pub fn reset(&self) {
        *self.last.lock() = None;
    }

    pub fn shares_state_with(&self, other: &EmissionClock) -> bool {
        Arc::ptr_eq(&self.last, &other.last)
    }
}

pub struct ClockGuard<'a> {
    last: MutexGuard<'a, Option<Instant>>,
}

impl ClockGuard<'_> {
    /// Record an emission at `now`, returning the time since the previous one
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        let previous = *self.last;
        *self.last = Some(previous.map_or(now, |prev| prev.max(now)));
        previous.map(|prev| now.saturating_duration_since(prev))
    }
}
