use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Which admission strategy guards an account's request rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimiterKind {
    FixedWindow,
    SlidingWindow,
    TokenBucket,
    LeakyBucket,
}

/// Settings for one account at the external payment gateway.
///
/// The rate and parallelism budgets apply per account: a single limiter and
/// gate are built from these values and shared by every submission for the
/// account's lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Name of the external service the account belongs to.
    pub service_name: String,
    /// Name of the account itself, also used as the log context.
    pub account_name: String,
    /// Request-rate budget, in call starts per second.
    pub rate_limit_per_sec: u32,
    /// Concurrency budget: maximum simultaneous in-flight calls.
    pub parallel_requests: u32,
    /// Average time the gateway takes to process one call.
    pub average_processing_time_ms: u64,
    /// Whether the account may be used at all.
    pub enabled: bool,
    /// Cost of processing one payment through this account.
    pub price: Decimal,
    #[serde(default = "default_limiter")]
    pub limiter: RateLimiterKind,
}

fn default_limiter() -> RateLimiterKind {
    RateLimiterKind::SlidingWindow
}

impl AccountConfig {
    /// Loads an account configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn average_processing_time(&self) -> Duration {
        Duration::from_millis(self.average_processing_time_ms)
    }

    /// Hard deadline for one gateway call: twice the average processing time.
    pub fn deadline(&self) -> Duration {
        self.average_processing_time() * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_json() -> &'static str {
        r#"{
            "service_name": "acquiring",
            "account_name": "acc-1",
            "rate_limit_per_sec": 10,
            "parallel_requests": 4,
            "average_processing_time_ms": 800,
            "enabled": true,
            "price": "30"
        }"#
    }

    #[test]
    fn test_config_deserialization_defaults_limiter() {
        let config: AccountConfig = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(config.account_name, "acc-1");
        assert_eq!(config.price, dec!(30));
        assert_eq!(config.limiter, RateLimiterKind::SlidingWindow);
    }

    #[test]
    fn test_config_explicit_limiter_kind() {
        let json = sample_json().replace(
            "\"enabled\": true,",
            "\"enabled\": true, \"limiter\": \"token_bucket\",",
        );
        let config: AccountConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.limiter, RateLimiterKind::TokenBucket);
    }

    #[test]
    fn test_deadline_is_twice_average_processing_time() {
        let config: AccountConfig = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(config.average_processing_time(), Duration::from_millis(800));
        assert_eq!(config.deadline(), Duration::from_millis(1600));
    }
}
