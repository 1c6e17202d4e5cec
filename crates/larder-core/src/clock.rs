//! # Clock
//!
//! Source of "now" for mutations and import coercion.
//!
//! Timestamps are truncated to whole milliseconds because that is the
//! resolution of the wire format; a record compared before and after a
//! persistence round trip must stay equal.

use std::sync::Mutex;

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Something that can tell the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant, millisecond precision.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// A clock that only moves when told to.
///
/// ## Usage
/// ```rust
/// use chrono::Duration;
/// use larder_core::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::at_millis(0);
/// clock.advance(Duration::hours(1));
/// assert_eq!(clock.now().timestamp_millis(), 3_600_000);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Mutex::new(start.trunc_subsecs(3)),
        }
    }

    /// Creates a clock frozen at the given epoch milliseconds.
    pub fn at_millis(ms: i64) -> Self {
        Self::new(DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default())
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += by;
    }

    /// Jumps to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now = to.trunc_subsecs(3);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}
