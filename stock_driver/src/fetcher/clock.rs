//! Wall-clock time for the poller.

use chrono::{DateTime, FixedOffset, Local};
use std::thread;
use std::time::Duration;

/// Source of the current local time, and the poller's only way to wait.
pub trait Clock {
    /// Current local time with its UTC offset.
    ///
    /// Differences and comparisons between two readings are absolute, so a daylight saving
    /// change between them does not stretch or shrink the interval. The hour and minute
    /// fields are still the local ones.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The machine's local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
