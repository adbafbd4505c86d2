use crate::domain::account::AccountConfig;
use crate::domain::payment::{GatewayCall, GatewayResponse, PaymentOutcome, PaymentRequest};
use crate::domain::ports::{GatewayTransport, GatewayTransportArc, PaymentJournalArc, RateLimiterBox};
use crate::error::TransportError;
use crate::infrastructure::gate::ConcurrencyGate;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// How long an admission loop sleeps before retrying when either budget
/// denies.
const ADMISSION_BACKOFF: Duration = Duration::from_millis(10);

/// Orchestrates admission, dispatch and outcome recording for one external
/// gateway account.
///
/// The dispatcher owns the account's rate limiter and concurrency gate for
/// its whole lifetime; every submission shares them. Once a call has been
/// admitted, its result is observable only through the journal: `submit`
/// never surfaces a post-admission failure to its caller.
pub struct PaymentDispatcher {
    config: AccountConfig,
    limiter: RateLimiterBox,
    gate: Arc<ConcurrencyGate>,
    transport: GatewayTransportArc,
    journal: PaymentJournalArc,
}

impl PaymentDispatcher {
    pub fn new(
        config: AccountConfig,
        limiter: RateLimiterBox,
        transport: GatewayTransportArc,
        journal: PaymentJournalArc,
    ) -> Self {
        let gate = Arc::new(ConcurrencyGate::new(config.parallel_requests));
        Self {
            config,
            limiter,
            gate,
            transport,
            journal,
        }
    }

    /// Submits one payment for execution.
    ///
    /// Waits (asynchronously, with backpressure on the calling task) until
    /// both the rate and the concurrency budget admit the call, records the
    /// submission, then issues the call on its own task and returns. The
    /// returned handle completes once the outcome has been recorded and the
    /// permit released; callers that need to drain in-flight work can await
    /// it.
    pub async fn submit(&self, request: PaymentRequest) -> JoinHandle<()> {
        // A granted rate tick is deliberately not refunded when the gate then
        // denies: rate capacity accounts for call starts.
        while !(self.limiter.tick() && self.gate.try_acquire()) {
            tokio::time::sleep(ADMISSION_BACKOFF).await;
        }

        let transaction_id = Uuid::new_v4();
        warn!(
            account = %self.config.account_name,
            payment_id = %request.payment_id,
            "submitting payment request"
        );
        info!(
            account = %self.config.account_name,
            payment_id = %request.payment_id,
            %transaction_id,
            "submit"
        );

        // The submission must be on record before the call leaves the
        // process, whatever the eventual outcome.
        let elapsed = request.started_at.elapsed().unwrap_or_default();
        if let Err(err) = self
            .journal
            .record_submission(request.payment_id, true, transaction_id, SystemTime::now(), elapsed)
            .await
        {
            error!(
                account = %self.config.account_name,
                %transaction_id,
                %err,
                "failed to record submission"
            );
        }

        let call = GatewayCall {
            service_name: self.config.service_name.clone(),
            account_name: self.config.account_name.clone(),
            transaction_id,
            payment_id: request.payment_id,
            amount: request.amount,
            timeout: self.config.deadline(),
        };

        let gate = Arc::clone(&self.gate);
        let transport = Arc::clone(&self.transport);
        let journal = Arc::clone(&self.journal);
        let account = self.config.account_name.clone();
        tokio::spawn(async move {
            let outcome = dispatch(transport.as_ref(), &call).await;
            match &outcome {
                PaymentOutcome::Success { .. } | PaymentOutcome::Declined { .. } => warn!(
                    account = %account,
                    transaction_id = %call.transaction_id,
                    payment_id = %call.payment_id,
                    succeeded = outcome.succeeded(),
                    "payment processed"
                ),
                PaymentOutcome::TimedOut => error!(
                    account = %account,
                    transaction_id = %call.transaction_id,
                    payment_id = %call.payment_id,
                    "payment timed out"
                ),
                PaymentOutcome::TransportFailed { reason }
                | PaymentOutcome::MalformedResponse { reason } => error!(
                    account = %account,
                    transaction_id = %call.transaction_id,
                    payment_id = %call.payment_id,
                    %reason,
                    "payment failed"
                ),
            }

            if let Err(err) = journal
                .record_processing_result(
                    call.payment_id,
                    outcome.succeeded(),
                    SystemTime::now(),
                    call.transaction_id,
                    outcome.reason(),
                )
                .await
            {
                error!(
                    account = %account,
                    transaction_id = %call.transaction_id,
                    %err,
                    "failed to record processing result"
                );
            }
            // The permit goes back whatever happened above.
            gate.release();
        })
    }

    pub fn price(&self) -> Decimal {
        self.config.price
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn name(&self) -> &str {
        &self.config.account_name
    }

    /// Calls currently holding a concurrency permit.
    pub fn in_flight(&self) -> u32 {
        self.gate.in_flight()
    }
}

/// Issues the call and classifies its terminal outcome. Exactly one branch is
/// taken per attempt.
///
/// The transport is already bound to the call deadline; the same deadline is
/// enforced here again so a stuck transport cannot hold the permit past it.
async fn dispatch(transport: &dyn GatewayTransport, call: &GatewayCall) -> PaymentOutcome {
    match tokio::time::timeout(call.timeout, transport.send(call)).await {
        Ok(Ok(body)) => match serde_json::from_str::<GatewayResponse>(&body) {
            Ok(response) if response.result => PaymentOutcome::Success {
                message: response.message,
            },
            Ok(response) => PaymentOutcome::Declined {
                reason: response.message,
            },
            Err(err) => PaymentOutcome::MalformedResponse {
                reason: err.to_string(),
            },
        },
        Ok(Err(TransportError::TimedOut)) | Err(_) => PaymentOutcome::TimedOut,
        Ok(Err(TransportError::Failed(reason))) => PaymentOutcome::TransportFailed { reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    enum StubBehavior {
        Respond(&'static str),
        Fail(&'static str),
        TimeOut,
        Hang,
    }

    struct StubTransport(StubBehavior);

    #[async_trait]
    impl GatewayTransport for StubTransport {
        async fn send(&self, _call: &GatewayCall) -> Result<String, TransportError> {
            match &self.0 {
                StubBehavior::Respond(body) => Ok(body.to_string()),
                StubBehavior::Fail(reason) => Err(TransportError::Failed(reason.to_string())),
                StubBehavior::TimeOut => Err(TransportError::TimedOut),
                StubBehavior::Hang => std::future::pending().await,
            }
        }
    }

    fn call() -> GatewayCall {
        GatewayCall {
            service_name: "acquiring".to_string(),
            account_name: "acc-1".to_string(),
            transaction_id: Uuid::new_v4(),
            payment_id: Uuid::new_v4(),
            amount: dec!(100),
            timeout: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn test_successful_response_classifies_as_success() {
        let transport = StubTransport(StubBehavior::Respond(r#"{"result": true, "message": null}"#));
        let outcome = dispatch(&transport, &call()).await;
        assert_eq!(outcome, PaymentOutcome::Success { message: None });
    }

    #[tokio::test]
    async fn test_declined_response_carries_the_gateway_message() {
        let transport = StubTransport(StubBehavior::Respond(
            r#"{"result": false, "message": "insufficient funds"}"#,
        ));
        let outcome = dispatch(&transport, &call()).await;
        assert_eq!(
            outcome,
            PaymentOutcome::Declined {
                reason: Some("insufficient funds".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_unparseable_body_classifies_as_malformed() {
        let transport = StubTransport(StubBehavior::Respond("<html>503</html>"));
        let outcome = dispatch(&transport, &call()).await;
        match outcome {
            PaymentOutcome::MalformedResponse { reason } => assert!(!reason.is_empty()),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_timeout_classifies_as_timed_out() {
        let transport = StubTransport(StubBehavior::TimeOut);
        let outcome = dispatch(&transport, &call()).await;
        assert_eq!(outcome, PaymentOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_transport_failure_carries_the_error_message() {
        let transport = StubTransport(StubBehavior::Fail("connection reset"));
        let outcome = dispatch(&transport, &call()).await;
        assert_eq!(
            outcome,
            PaymentOutcome::TransportFailed {
                reason: "connection reset".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_deadline_fires_when_the_transport_hangs() {
        let transport = StubTransport(StubBehavior::Hang);
        let outcome = dispatch(&transport, &call()).await;
        assert_eq!(outcome, PaymentOutcome::TimedOut);
    }
}
