use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Lifecycle of a [`HeartbeatEmitter`](super::HeartbeatEmitter).
///
/// There is no terminal state: a stopped emitter can be started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    /// Not started yet, or stopped
    Idle,
    /// Timer armed, beats repeat indefinitely
    Running,
}

/// Point-in-time view of the emitter counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitterStats {
    /// Ticks that issued a transport call
    pub attempted: u64,
    pub succeeded: u64,
    /// Beats that errored or timed out
    pub failed: u64,
    /// Ticks dropped because the previous beat was still in flight
    pub skipped: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    attempted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

impl Counters {
    pub fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EmitterStats {
        EmitterStats {
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Marks a beat as outstanding until dropped, including when the beat task
/// is aborted mid-flight.
pub(crate) struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    /// Claims the slot, or returns `None` if a beat is already outstanding
    pub fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_guard_is_exclusive_until_dropped() {
        let flag = Arc::new(AtomicBool::new(false));

        let guard = InFlightGuard::try_acquire(&flag).expect("slot should be free");
        assert!(InFlightGuard::try_acquire(&flag).is_none());

        drop(guard);
        assert!(InFlightGuard::try_acquire(&flag).is_some());
    }

    #[test]
    fn test_counters_snapshot() {
        let counters = Counters::default();
        counters.record_attempt();
        counters.record_attempt();
        counters.record_success();
        counters.record_failure();
        counters.record_skip();

        assert_eq!(
            counters.snapshot(),
            EmitterStats {
                attempted: 2,
                succeeded: 1,
                failed: 1,
                skipped: 1,
            }
        );
    }
}
