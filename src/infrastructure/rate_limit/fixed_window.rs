use crate::domain::ports::RateLimiter;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fixed-window admission: time is divided into consecutive aligned windows
/// of equal length and a counter resets at each boundary.
///
/// Bursts straddling a window boundary can admit up to twice the limit in a
/// short span; that is inherent to the strategy and accepted here.
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

struct WindowState {
    /// Start of the window the counter belongs to.
    window_start: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    /// # Panics
    ///
    /// Panics if `limit` is zero or `window` is zero.
    pub fn new(limit: u32, window: Duration) -> Self {
        assert!(limit > 0, "limit must be greater than 0");
        assert!(!window.is_zero(), "window must be non-zero");
        Self {
            limit,
            window,
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Deterministic variant of [`RateLimiter::tick`] taking the clock as an
    /// argument.
    pub fn tick_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(elapsed) = now.checked_duration_since(state.window_start)
            && elapsed >= self.window
        {
            // Advance to the aligned window containing `now`.
            let periods = (elapsed.as_nanos() / self.window.as_nanos()) as u32;
            state.window_start += self.window * periods;
            state.count = 0;
        }
        if state.count < self.limit {
            state.count += 1;
            true
        } else {
            false
        }
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn tick(&self) -> bool {
        self.tick_at(Instant::now())
    }
}
