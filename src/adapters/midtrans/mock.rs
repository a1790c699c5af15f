//! Mock payment provider for testing.
//!
//! Configurable in-memory implementation of `PaymentProvider`. Supports
//! canned responses, error injection, and call recording.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::PaymentError;
use crate::ports::{ChargeAction, ChargeRequest, ChargeResponse, PaymentProvider};

/// Mock payment provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.set_error(PaymentError::ProviderChargeFailed("down".into()));
///
/// let result = mock.charge(request).await;
/// assert!(result.is_err());
/// assert_eq!(mock.charge_calls().len(), 1);
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Response for the next charge; a default pending QRIS response when
    /// unset.
    next_response: Option<ChargeResponse>,

    /// Error to return instead of a response.
    next_error: Option<PaymentError>,

    /// Every charge request received, in order.
    charge_calls: Vec<ChargeRequest>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response returned by the next charge.
    pub fn set_response(&self, response: ChargeResponse) {
        self.inner.lock().unwrap().next_response = Some(response);
    }

    /// Makes every charge fail with the given error until cleared.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Clears any injected error.
    pub fn clear_error(&self) {
        self.inner.lock().unwrap().next_error = None;
    }

    /// Returns a copy of every charge request received so far.
    pub fn charge_calls(&self) -> Vec<ChargeRequest> {
        self.inner.lock().unwrap().charge_calls.clone()
    }

    /// A pending QRIS response carrying a QR-code action for the order.
    fn default_response(order_id: &str) -> ChargeResponse {
        ChargeResponse {
            transaction_status: "pending".to_string(),
            actions: vec![ChargeAction {
                name: "generate-qr-code".to_string(),
                url: format!("https://mock.payment.test/qr/{order_id}"),
            }],
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeResponse, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.charge_calls.push(request.clone());

        if let Some(error) = state.next_error.clone() {
            return Err(error);
        }

        let response = state
            .next_response
            .take()
            .unwrap_or_else(|| Self::default_response(&request.order_id));
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ItemDetail;

    fn sample_request() -> ChargeRequest {
        ChargeRequest {
            order_id: "ORDER-mock".to_string(),
            gross_amount: 5000,
            items: vec![ItemDetail {
                name: "Teh Tarik".to_string(),
                price: 5000,
                quantity: 1,
            }],
        }
    }

    #[tokio::test]
    async fn default_response_carries_qr_action() {
        let mock = MockPaymentProvider::new();
        let response = mock.charge(sample_request()).await.unwrap();

        assert_eq!(response.transaction_status, "pending");
        assert!(response.action_url("generate-qr-code").is_some());
    }

    #[tokio::test]
    async fn injected_error_fails_the_charge() {
        let mock = MockPaymentProvider::new();
        mock.set_error(PaymentError::ProviderChargeFailed("down".to_string()));

        assert!(mock.charge(sample_request()).await.is_err());

        mock.clear_error();
        assert!(mock.charge(sample_request()).await.is_ok());
    }

    #[tokio::test]
    async fn charge_calls_are_recorded() {
        let mock = MockPaymentProvider::new();
        mock.charge(sample_request()).await.unwrap();

        let calls = mock.charge_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].order_id, "ORDER-mock");
        assert_eq!(calls[0].gross_amount, 5000);
    }
}
