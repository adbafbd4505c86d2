use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Reason string recorded when an attempt misses its deadline.
pub const TIMEOUT_REASON: &str = "Request timeout.";

/// A request to execute one payment through the external gateway.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub payment_id: Uuid,
    pub amount: Decimal,
    /// When the payment entered the pipeline; the submission record reports
    /// how long the payment waited before being admitted.
    pub started_at: SystemTime,
}

impl PaymentRequest {
    pub fn new(payment_id: Uuid, amount: Decimal) -> Self {
        Self {
            payment_id,
            amount,
            started_at: SystemTime::now(),
        }
    }
}

/// Identifying parameters of one outbound gateway call.
///
/// The transaction id is fresh per attempt and correlates the submission
/// record with the processing record; the payment id identifies the payment
/// across attempts.
#[derive(Debug, Clone)]
pub struct GatewayCall {
    pub service_name: String,
    pub account_name: String,
    pub transaction_id: Uuid,
    pub payment_id: Uuid,
    pub amount: Decimal,
    /// Deadline the transport binds the call to.
    pub timeout: Duration,
}

/// Response body returned by the external gateway.
///
/// Only the `result` flag is required; the id echoes and the message may be
/// absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    pub result: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Terminal classification of one dispatched call attempt.
///
/// Exactly one outcome is produced per attempt and recorded exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Gateway confirmed the payment.
    Success { message: Option<String> },
    /// Gateway reported a business failure.
    Declined { reason: Option<String> },
    /// Neither the transport nor the dispatch deadline was met.
    TimedOut,
    /// The call never produced a response body.
    TransportFailed { reason: String },
    /// The gateway answered with a body that did not parse.
    MalformedResponse { reason: String },
}

impl PaymentOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Reason string recorded with the processing result.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Success { message } => message.clone(),
            Self::Declined { reason } => reason.clone(),
            Self::TimedOut => Some(TIMEOUT_REASON.to_string()),
            Self::TransportFailed { reason } | Self::MalformedResponse { reason } => {
                Some(reason.clone())
            }
        }
    }
}
