use crate::domain::ports::RateLimiter;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Token-bucket admission: the bucket refills at a steady rate and each
/// admitted tick consumes one token.
///
/// The bucket starts full, so capacity above the steady rate lets short
/// bursts through without raising the average.
pub struct TokenBucketLimiter {
    capacity: u32,
    refill_interval: Duration,
    refill_amount: u32,
    state: Mutex<BucketState>,
}

struct BucketState {
    available: u32,
    /// End of the last whole refill interval that has been applied.
    last_refill: Instant,
}

impl TokenBucketLimiter {
    /// # Panics
    ///
    /// Panics if any parameter is zero.
    pub fn new(capacity: u32, refill_interval: Duration, refill_amount: u32) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        assert!(!refill_interval.is_zero(), "refill_interval must be non-zero");
        assert!(refill_amount > 0, "refill_amount must be greater than 0");
        Self {
            capacity,
            refill_interval,
            refill_amount,
            state: Mutex::new(BucketState {
                available: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Deterministic variant of [`RateLimiter::tick`] taking the clock as an
    /// argument.
    pub fn tick_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(elapsed) = now.checked_duration_since(state.last_refill) {
            let refills = (elapsed.as_nanos() / self.refill_interval.as_nanos()) as u32;
            if refills > 0 {
                let added = refills.saturating_mul(self.refill_amount);
                state.available = state.available.saturating_add(added).min(self.capacity);
                // Keep refill timing aligned to whole intervals.
                state.last_refill += self.refill_interval * refills;
            }
        }
        if state.available > 0 {
            state.available -= 1;
            true
        } else {
            false
        }
    }
}

impl RateLimiter for TokenBucketLimiter {
    fn tick(&self) -> bool {
        self.tick_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_burst_up_to_capacity() {
        let limiter = TokenBucketLimiter::new(4, Duration::from_secs(1), 2);
        let base = Instant::now();
        for _ in 0..4 {
            assert!(limiter.tick_at(base));
        }
        assert!(!limiter.tick_at(base));
    }

    #[test]
    fn test_refill_after_interval() {
        let limiter = TokenBucketLimiter::new(4, Duration::from_secs(1), 2);
        let base = Instant::now();
        for _ in 0..4 {
            assert!(limiter.tick_at(base));
        }
        // One whole interval refills two tokens, no more.
        assert!(limiter.tick_at(base + Duration::from_secs(1)));
        assert!(limiter.tick_at(base + Duration::from_secs(1)));
        assert!(!limiter.tick_at(base + Duration::from_secs(1)));
    }

    #[test]
    fn test_no_partial_refill_before_interval_elapses() {
        let limiter = TokenBucketLimiter::new(1, Duration::from_secs(1), 1);
        let base = Instant::now();
        assert!(limiter.tick_at(base));
        assert!(!limiter.tick_at(base + Duration::from_millis(900)));
        assert!(limiter.tick_at(base + Duration::from_millis(1100)));
    }

    #[test]
    fn test_refill_capped_at_capacity() {
        let limiter = TokenBucketLimiter::new(3, Duration::from_secs(1), 2);
        let base = Instant::now();
        assert!(limiter.tick_at(base));
        // Ten idle intervals would refill twenty tokens; the bucket holds 3.
        let later = base + Duration::from_secs(10);
        for _ in 0..3 {
            assert!(limiter.tick_at(later));
        }
        assert!(!limiter.tick_at(later));
    }

    #[test]
    fn test_refill_timing_stays_aligned() {
        let limiter = TokenBucketLimiter::new(1, Duration::from_secs(1), 1);
        let base = Instant::now();
        assert!(limiter.tick_at(base));
        // +1.5s applies the interval ending at +1s; the next one ends at +2s.
        assert!(limiter.tick_at(base + Duration::from_millis(1500)));
        assert!(!limiter.tick_at(base + Duration::from_millis(1900)));
        assert!(limiter.tick_at(base + Duration::from_millis(2100)));
    }
}
