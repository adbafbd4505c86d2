use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),
    #[error("Journal error: {0}")]
    JournalError(String),
}

/// Failure modes of a single gateway call, as seen by the dispatch layer.
///
/// Timeouts are kept apart from every other transport fault because they
/// classify into a different terminal outcome.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    TimedOut,
    #[error("{0}")]
    Failed(String),
}
