//! Time source abstraction.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync + std::fmt::Debug + 'static {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Used to simulate elapsed time against the in-memory stores.
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    ///
    /// Instants past the nanosecond range (year 2262) are clamped to it.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            nanos: AtomicI64::new(start.timestamp_nanos_opt().unwrap_or(i64::MAX)),
        }
    }

    /// Move the clock forward, saturating at the end of the representable range.
    pub fn advance(&self, by: Duration) {
        let delta = i64::try_from(by.as_nanos()).unwrap_or(i64::MAX);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |nanos| {
                Some(nanos.saturating_add(delta))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        clock.advance(Duration::from_secs(16 * 60));
        let elapsed = clock.now() - start;
        assert_eq!(elapsed.num_minutes(), 16);
    }

    #[test]
    fn test_manual_clock_keeps_start_exactly() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_nanos(1));
        assert_eq!((clock.now() - start).num_nanoseconds(), Some(1));
    }

    #[test]
    fn test_manual_clock_advance_saturates() {
        let clock = ManualClock::new(Utc::now());
        clock.advance(Duration::MAX);
        clock.advance(Duration::from_secs(60));
        assert_eq!(clock.now(), DateTime::from_timestamp_nanos(i64::MAX));
    }
}
