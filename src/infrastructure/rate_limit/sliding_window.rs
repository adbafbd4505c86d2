use crate::domain::ports::RateLimiter;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window admission: keeps the timestamps of granted ticks within the
/// trailing window and admits while fewer than `limit` remain.
///
/// Smooths the boundary bursts of the fixed window; memory is bounded by
/// `limit` since older timestamps are evicted before every decision.
pub struct SlidingWindowLimiter {
    limit: u32,
    window: Duration,
    granted: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    /// # Panics
    ///
    /// Panics if `limit` is zero or `window` is zero.
    pub fn new(limit: u32, window: Duration) -> Self {
        assert!(limit > 0, "limit must be greater than 0");
        assert!(!window.is_zero(), "window must be non-zero");
        Self {
            limit,
            window,
            granted: Mutex::new(VecDeque::with_capacity(limit as usize)),
        }
    }

    /// Deterministic variant of [`RateLimiter::tick`] taking the clock as an
    /// argument.
    pub fn tick_at(&self, now: Instant) -> bool {
        let mut granted = self.granted.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cutoff) = now.checked_sub(self.window) {
            while granted.front().is_some_and(|&t| t <= cutoff) {
                granted.pop_front();
            }
        }
        if (granted.len() as u32) < self.limit {
            granted.push_back(now);
            true
        } else {
            false
        }
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn tick(&self) -> bool {
        self.tick_at(Instant::now())
    }
}
