//! Minute buckets (`HH:MM`) and the tracker that gates polling rounds.
//!
//! Sampling happens once per calendar minute, not once every sixty seconds: a new round
//! is due whenever the minute component of the clock differs from the one last recorded.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::StockError;
use crate::result::Result;

/// Formats an hour and minute as a zero-padded `HH:MM` string.
pub fn format_bucket(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// Calendar minute a quote sample belongs to, as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeBucket(String);

impl TimeBucket {
    /// Bucket of the given wall-clock time.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        TimeBucket(format_bucket(time.hour(), time.minute()))
    }

    /// Bucket text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parses `HH:MM` where the hour matches `[0-2][0-9]` and the minute `[0-5][0-9]`.
///
/// Hours 24 to 29 pass this check; the accepted format is kept as the CLI has always
/// accepted it.
impl FromStr for TimeBucket {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        let b = s.as_bytes();
        let valid = b.len() == 5
            && matches!(b[0], b'0'..=b'2')
            && b[1].is_ascii_digit()
            && b[2] == b':'
            && matches!(b[3], b'0'..=b'5')
            && b[4].is_ascii_digit();
        if !valid {
            return Err(StockError::InvalidTimeBucket(s.to_string()));
        }
        Ok(TimeBucket(s.to_string()))
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remembers the minute of the last sampling round.
#[derive(Debug, Default, Clone)]
pub struct MinuteTracker {
    last_minute: Option<u32>,
}

impl MinuteTracker {
    /// Returns `true` if no round ran yet or the minute has changed since the last one.
    pub fn is_due<T: Timelike>(&self, now: &T) -> bool {
        self.last_minute != Some(now.minute())
    }

    /// Records the minute of the round just processed.
    pub fn record<T: Timelike>(&mut self, processed: &T) {
        self.last_minute = Some(processed.minute());
    }
}

/// Time left until the next whole second.
pub fn until_next_second<T: Timelike>(now: &T) -> Duration {
    // nanosecond() exceeds 1e9 during a leap second.
    let nanos = u64::from(now.nanosecond() % 1_000_000_000);
    Duration::from_nanos(1_000_000_000 - nanos)
}
