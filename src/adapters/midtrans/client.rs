//! HTTP client for the Midtrans Core API.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use crate::config::PaymentConfig;
use crate::domain::PaymentError;
use crate::ports::{ChargeRequest, ChargeResponse, PaymentProvider};

use super::types::{ChargeBody, ChargeReply};

/// `PaymentProvider` backed by the Midtrans Core API.
///
/// Authenticates with HTTP basic auth: the server key is the username and
/// the password is empty, per the Midtrans API convention.
pub struct MidtransClient {
    config: PaymentConfig,
    http_client: reqwest::Client,
}

impl MidtransClient {
    /// Creates a client for the environment selected by the configuration.
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentProvider for MidtransClient {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeResponse, PaymentError> {
        let url = format!("{}/v2/charge", self.config.base_url());
        let order_id = request.order_id.clone();
        let body = ChargeBody::from_request(request);

        debug!(order_id = %order_id, "sending charge request");

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.server_key.expose_secret(), None::<&str>)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::ProviderChargeFailed(e.to_string()))?;

        let http_status = response.status();
        let reply: ChargeReply = response
            .json()
            .await
            .map_err(|e| PaymentError::ProviderChargeFailed(e.to_string()))?;

        if !reply.accepted() {
            warn!(
                order_id = %order_id,
                http_status = %http_status,
                status_code = %reply.status_code,
                "charge refused by provider"
            );
            return Err(PaymentError::ProviderChargeFailed(format!(
                "status {}: {}",
                reply.status_code, reply.status_message
            )));
        }

        debug!(order_id = %order_id, status = %reply.transaction_status, "charge accepted");
        Ok(reply.into_response())
    }
}
