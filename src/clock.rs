//! Clock abstraction for heartbeat timestamps.

use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current Unix time in whole seconds.
pub trait Clock: Send + Sync {
    fn now_unix_secs(&self) -> i64;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Wraps a [`Clock`] so successive stamps never go backwards, even when the
/// wall clock is stepped back between ticks.
pub struct MonotonicStamp {
    clock: Arc<dyn Clock>,
    last: AtomicI64,
}

impl MonotonicStamp {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicI64::new(i64::MIN),
        }
    }

    /// Next timestamp, `>=` every value previously returned
    pub fn next(&self) -> i64 {
        let now = self.clock.now_unix_secs();
        let previous = self.last.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }
}
