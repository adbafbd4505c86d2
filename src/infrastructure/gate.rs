use std::sync::atomic::{AtomicU32, Ordering};

/// Bounded counting gate capping simultaneous in-flight gateway calls.
///
/// The gate holds a single in-flight counter that stays within
/// `0..=max_parallel` under arbitrary interleavings. `release` saturates at
/// zero and does not detect double release; pairing each successful
/// `try_acquire` with exactly one `release` is the caller's obligation.
pub struct ConcurrencyGate {
    max_parallel: u32,
    in_flight: AtomicU32,
}

impl ConcurrencyGate {
    /// # Panics
    ///
    /// Panics if `max_parallel` is zero.
    pub fn new(max_parallel: u32) -> Self {
        assert!(max_parallel > 0, "max_parallel must be greater than 0");
        Self {
            max_parallel,
            in_flight: AtomicU32::new(0),
        }
    }

    /// Claims one permit iff the gate is not full. Non-blocking.
    pub fn try_acquire(&self) -> bool {
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_parallel).then_some(n + 1)
            })
            .is_ok()
    }

    /// Returns one permit. Saturates at zero.
    pub fn release(&self) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> u32 {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn max_parallel(&self) -> u32 {
        self.max_parallel
    }
}
