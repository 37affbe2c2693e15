//! Time representation for timed transitions.
//!
//! The engine never reads a clock. Hosts pass a `Timestamp` into every
//! `init`/`dispatch` call, and timed transitions compare it against the
//! instant their source state was entered. Timestamps are a fixed-width
//! counter that is allowed to wrap, so every comparison goes through
//! modular subtraction.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Point in time as seen by the engine: a wrapping unsigned counter.
pub type Timestamp = u32;

/// Length of time in the same units as [`Timestamp`].
pub type Ticks = u32;

/// Decides whether at least `duration` has elapsed between `entered` and `now`.
pub type IsAfterFn = fn(duration: Ticks, entered: Timestamp, now: Timestamp) -> bool;

/// Time elapsed from `entered` to `now`, computed modulo the counter width.
///
/// # Example
///
/// ```rust
/// use statechart::core::time::elapsed;
///
/// assert_eq!(elapsed(100, 250), 150);
/// // The counter wrapped between the two readings.
/// assert_eq!(elapsed(u32::MAX - 9, 20), 30);
/// ```
pub fn elapsed(entered: Timestamp, now: Timestamp) -> Ticks {
    now.wrapping_sub(entered)
}

/// Default comparison: true once `elapsed(entered, now) >= duration`.
///
/// # Example
///
/// ```rust
/// use statechart::core::time::is_after;
///
/// assert!(!is_after(60_000, 0, 59_999));
/// assert!(is_after(60_000, 0, 60_000));
/// assert!(is_after(10, u32::MAX - 4, 5));
/// ```
pub fn is_after(duration: Ticks, entered: Timestamp, now: Timestamp) -> bool {
    duration <= elapsed(entered, now)
}

/// Convert a std duration into millisecond ticks, saturating at `Ticks::MAX`.
pub fn ticks_from(duration: Duration) -> Ticks {
    Ticks::try_from(duration.as_millis()).unwrap_or(Ticks::MAX)
}

/// Wall clock that reports milliseconds since an origin as a wrapping [`Timestamp`].
///
/// For hosts that have no tick counter of their own.
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    origin: DateTime<Utc>,
}

impl WallClock {
    /// Clock whose zero is the current instant.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Clock whose zero is `origin`.
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> DateTime<Utc> {
        self.origin
    }

    /// Engine timestamp for the current wall-clock instant.
    pub fn now(&self) -> Timestamp {
        self.at(Utc::now())
    }

    /// Engine timestamp for `instant`.
    pub fn at(&self, instant: DateTime<Utc>) -> Timestamp {
        let millis = instant.signed_duration_since(self.origin).num_milliseconds();
        // Truncation keeps the value congruent modulo 2^32.
        millis as u64 as Timestamp
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}
