//! Admission strategies guarding the per-account request rate.
//!
//! Four interchangeable strategies sit behind the `RateLimiter` contract:
//! fixed window, sliding window, token bucket and leaky bucket. Each keeps
//! its counters behind a mutex so concurrent ticks admit atomically, and each
//! exposes a deterministic `tick_at` variant that takes the clock as an
//! argument.

mod fixed_window;
mod leaky_bucket;
mod sliding_window;
mod token_bucket;

pub use fixed_window::FixedWindowLimiter;
pub use leaky_bucket::LeakyBucketLimiter;
pub use sliding_window::SlidingWindowLimiter;
pub use token_bucket::TokenBucketLimiter;

use crate::domain::account::{AccountConfig, RateLimiterKind};
use crate::domain::ports::RateLimiterBox;
use std::time::Duration;

/// Builds the strategy an account is configured with.
///
/// Selection happens once at construction; the dispatcher only ever sees the
/// `RateLimiter` contract.
pub fn build_limiter(config: &AccountConfig) -> RateLimiterBox {
    let rate = config.rate_limit_per_sec;
    let window = Duration::from_secs(1);
    match config.limiter {
        RateLimiterKind::FixedWindow => Box::new(FixedWindowLimiter::new(rate, window)),
        RateLimiterKind::SlidingWindow => Box::new(SlidingWindowLimiter::new(rate, window)),
        // A little headroom over the steady rate absorbs short bursts.
        RateLimiterKind::TokenBucket => Box::new(TokenBucketLimiter::new(rate + 2, window, rate)),
        RateLimiterKind::LeakyBucket => Box::new(LeakyBucketLimiter::new(rate, window, rate)),
    }
}
