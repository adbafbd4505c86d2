use std::path::{Path, PathBuf};

pub fn write_account_config(dir: &Path, enabled: bool) -> PathBuf {
    let config = serde_json::json!({
        "service_name": "acquiring",
        "account_name": "acc-1",
        "rate_limit_per_sec": 10,
        "parallel_requests": 2,
        "average_processing_time_ms": 100,
        "enabled": enabled,
        "price": "30",
        "limiter": "sliding_window"
    });
    let path = dir.join("account.json");
    std::fs::write(&path, config.to_string()).expect("failed to write config fixture");
    path
}
