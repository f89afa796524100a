//! Clocks

use std::cell::Cell;

use jiff::{SignedDuration, Timestamp, civil::Date, tz::TimeZone};

/// Source of the current time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Timestamp;

    /// Current UTC calendar date.
    fn today(&self) -> Date {
        self.now().to_zoned(TimeZone::UTC).date()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Deterministic clock that moves forward by a fixed step on every reading.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<Timestamp>,
    step: SignedDuration,
}

impl ManualClock {
    /// Start at `start`, advancing one second per reading.
    pub fn new(start: Timestamp) -> Self {
        Self::with_step(start, SignedDuration::from_secs(1))
    }

    /// Start at `start`, advancing `step` per reading.
    pub fn with_step(start: Timestamp, step: SignedDuration) -> Self {
        Self {
            current: Cell::new(start),
            step,
        }
    }

    /// Jump to `at`.
    pub fn set(&self, at: Timestamp) {
        self.current.set(at);
    }

    /// The instant the next reading will return.
    pub fn peek(&self) -> Timestamp {
        self.current.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let now = self.current.get();

        self.current.set(now.checked_add(self.step).unwrap_or(now));

        now
    }
}
