//! Absolute timestamps and the clock abstraction.
//!
//! Lifetimes, path expirations and blacklist deadlines are all absolute
//! points on one monotonic timeline. Nothing in the routing layer reads a
//! clock by itself: callers sample a [`Clock`] and pass `now` down.

use core::fmt;
use core::ops::Add;
use std::cell::Cell;
use std::time::{Duration, Instant};

/// An absolute point in time, in milliseconds since the clock epoch.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The clock epoch. Also the "no expiry recorded" value.
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is later.
    pub fn saturating_duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// Signed number of seconds from `now` until `self`.
    ///
    /// Negative once `self` lies in the past.
    pub fn secs_from(&self, now: Timestamp) -> f64 {
        (self.0 as f64 - now.0 as f64) / 1000.0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.0 / 1000, self.0 % 1000)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Synthetic clock advanced explicitly by its owner.
///
/// Used by the scenario replayer and tests so that expiry can be exercised
/// with exact timestamps.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, to: Timestamp) {
        if to > self.now.get() {
            self.now.set(to);
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

/// Wall clock measured from the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let elapsed = self.epoch.elapsed().as_millis();
        Timestamp(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_duration() {
        let t = Timestamp::from_secs(10) + Duration::from_millis(1500);
        assert_eq!(t.as_millis(), 11_500);
    }

    #[test]
    fn test_add_saturates() {
        let t = Timestamp::from_millis(u64::MAX - 1) + Duration::from_secs(5);
        assert_eq!(t.as_millis(), u64::MAX);
    }

    #[test]
    fn test_secs_from_is_signed() {
        let now = Timestamp::from_secs(100);
        assert_eq!(Timestamp::from_millis(102_500).secs_from(now), 2.5);
        assert_eq!(Timestamp::from_secs(99).secs_from(now), -1.0);
    }

    #[test]
    fn test_saturating_duration_since() {
        let a = Timestamp::from_secs(5);
        let b = Timestamp::from_secs(7);
        assert_eq!(b.saturating_duration_since(a), Duration::from_secs(2));
        assert_eq!(a.saturating_duration_since(b), Duration::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::from_millis(12_045).to_string(), "12.045s");
        assert_eq!(format!("{:?}", Timestamp::ZERO), "Timestamp(0.000s)");
    }

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::new(Timestamp::from_secs(1));
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Timestamp::from_millis(1250));

        clock.set(Timestamp::from_secs(3));
        assert_eq!(clock.now(), Timestamp::from_secs(3));

        // Never runs backwards
        clock.set(Timestamp::from_secs(2));
        assert_eq!(clock.now(), Timestamp::from_secs(3));
    }

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
