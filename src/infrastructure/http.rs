use crate::domain::payment::GatewayCall;
use crate::domain::ports::GatewayTransport;
use crate::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;

/// `GatewayTransport` over HTTP.
///
/// Issues a POST with no body; the identifying parameters travel as query
/// parameters. Each request is bound to the call's timeout, so the transport
/// itself enforces the same deadline the dispatcher does.
pub struct HttpGatewayTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGatewayTransport {
    /// `base_url` is the gateway's processing endpoint, e.g.
    /// `http://localhost:1234/external/process`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(8))
            .build()
            .map_err(|e| TransportError::Failed(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl GatewayTransport for HttpGatewayTransport {
    async fn send(&self, call: &GatewayCall) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[
                ("serviceName", call.service_name.clone()),
                ("accountName", call.account_name.clone()),
                ("transactionId", call.transaction_id.to_string()),
                ("paymentId", call.payment_id.to_string()),
                ("amount", call.amount.to_string()),
                ("timeout", call.timeout.as_millis().to_string()),
            ])
            .timeout(call.timeout)
            .send()
            .await
            .map_err(map_error)?;
        response.text().await.map_err(map_error)
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut
    } else {
        TransportError::Failed(err.to_string())
    }
}
