use crate::domain::ports::RateLimiter;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Leaky-bucket admission: admitted ticks fill the bucket and drain out at a
/// fixed rate, smoothing the output rate rather than the input rate.
///
/// The drain is computed lazily from elapsed time before every capacity
/// check; there is no background task.
pub struct LeakyBucketLimiter {
    capacity: u32,
    leak_interval: Duration,
    leak_amount: u32,
    state: Mutex<LeakState>,
}

struct LeakState {
    /// Admitted units still draining.
    level: u32,
    /// End of the last whole leak interval that has been applied.
    last_leak: Instant,
}

impl LeakyBucketLimiter {
    /// # Panics
    ///
    /// Panics if any parameter is zero.
    pub fn new(capacity: u32, leak_interval: Duration, leak_amount: u32) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        assert!(!leak_interval.is_zero(), "leak_interval must be non-zero");
        assert!(leak_amount > 0, "leak_amount must be greater than 0");
        Self {
            capacity,
            leak_interval,
            leak_amount,
            state: Mutex::new(LeakState {
                level: 0,
                last_leak: Instant::now(),
            }),
        }
    }

    /// Deterministic variant of [`RateLimiter::tick`] taking the clock as an
    /// argument.
    pub fn tick_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(elapsed) = now.checked_duration_since(state.last_leak) {
            let leaks = (elapsed.as_nanos() / self.leak_interval.as_nanos()) as u32;
            if leaks > 0 {
                state.level = state.level.saturating_sub(leaks.saturating_mul(self.leak_amount));
                state.last_leak += self.leak_interval * leaks;
            }
        }
        if state.level < self.capacity {
            state.level += 1;
            true
        } else {
            false
        }
    }
}

impl RateLimiter for LeakyBucketLimiter {
    fn tick(&self) -> bool {
        self.tick_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_up_to_capacity() {
        let limiter = LeakyBucketLimiter::new(2, Duration::from_secs(1), 1);
        let base = Instant::now();
        assert!(limiter.tick_at(base));
        assert!(limiter.tick_at(base));
        assert!(!limiter.tick_at(base));
    }

    #[test]
    fn test_drains_at_the_leak_rate() {
        let limiter = LeakyBucketLimiter::new(2, Duration::from_secs(1), 1);
        let base = Instant::now();
        assert!(limiter.tick_at(base));
        assert!(limiter.tick_at(base));
        // One interval drains one unit: room for exactly one more.
        assert!(limiter.tick_at(base + Duration::from_secs(1)));
        assert!(!limiter.tick_at(base + Duration::from_secs(1)));
    }

    #[test]
    fn test_long_idle_empties_the_bucket() {
        let limiter = LeakyBucketLimiter::new(3, Duration::from_secs(1), 1);
        let base = Instant::now();
        for _ in 0..3 {
            assert!(limiter.tick_at(base));
        }
        let later = base + Duration::from_secs(10);
        for _ in 0..3 {
            assert!(limiter.tick_at(later));
        }
        assert!(!limiter.tick_at(later));
    }

    #[test]
    fn test_no_drain_before_interval_elapses() {
        let limiter = LeakyBucketLimiter::new(1, Duration::from_secs(1), 1);
        let base = Instant::now();
        assert!(limiter.tick_at(base));
        assert!(!limiter.tick_at(base + Duration::from_millis(900)));
        assert!(limiter.tick_at(base + Duration::from_millis(1100)));
    }
}
