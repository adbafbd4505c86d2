use super::payment::GatewayCall;
use crate::error::{Result, TransportError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Admission oracle answering "may one unit of work start now?".
///
/// `tick` is non-blocking; on `true` one unit of rate capacity has been
/// consumed as a side effect. A granted tick is never refunded, even if the
/// caller abandons the attempt: capacity accounts for call starts, not
/// completions.
pub trait RateLimiter: Send + Sync {
    fn tick(&self) -> bool;
}

pub type RateLimiterBox = Box<dyn RateLimiter>;

/// Transport issuing one call to the external gateway.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Sends the call, bound to `call.timeout`, and resolves to the raw
    /// response body.
    async fn send(&self, call: &GatewayCall) -> std::result::Result<String, TransportError>;
}

pub type GatewayTransportArc = Arc<dyn GatewayTransport>;

/// External payment state store the dispatcher records attempts into.
///
/// Both calls may be slow or fail; the dispatcher treats them as best-effort
/// and never retries them.
#[async_trait]
pub trait PaymentJournal: Send + Sync {
    /// Records that an attempt was sent to the gateway. Written before the
    /// call leaves the process, whatever the eventual outcome.
    async fn record_submission(
        &self,
        payment_id: Uuid,
        success: bool,
        transaction_id: Uuid,
        at: SystemTime,
        elapsed: Duration,
    ) -> Result<()>;

    /// Records the terminal outcome of an attempt.
    async fn record_processing_result(
        &self,
        payment_id: Uuid,
        success: bool,
        at: SystemTime,
        transaction_id: Uuid,
        reason: Option<String>,
    ) -> Result<()>;
}

pub type PaymentJournalArc = Arc<dyn PaymentJournal>;
