//! Payment provider port for external charge processing.
//!
//! Defines the contract for the QRIS charge integration. The provider's
//! webhook side is handled separately: notifications arrive through the
//! HTTP layer and are authenticated by signature in the payment service,
//! not through this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::PaymentError;

/// Port for the payment provider's charge API.
///
/// # Contract
///
/// - `charge` initiates a QRIS charge and returns the provider's initial
///   transaction status plus its action list
/// - Provider refusals and transport failures both surface as
///   `PaymentError::ProviderChargeFailed`
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Initiate a charge with the provider.
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeResponse, PaymentError>;
}

/// A charge request passed to the provider.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    /// Our order id, the correlation key for all later notifications.
    pub order_id: String,

    /// Server-computed gross amount in minor currency units.
    pub gross_amount: i64,

    /// Line items forwarded so they appear on the customer's receipt.
    pub items: Vec<ItemDetail>,
}

/// One line item forwarded to the provider.
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

/// The provider's response to a charge request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeResponse {
    /// The provider's initial transaction status (e.g. "pending").
    pub transaction_status: String,

    /// Follow-up actions the client can take; QRIS charges carry the
    /// QR-code URL here.
    pub actions: Vec<ChargeAction>,
}

/// One follow-up action from a charge response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeAction {
    pub name: String,
    pub url: String,
}

impl ChargeResponse {
    /// Finds the URL of the action with the given name.
    pub fn action_url(&self, name: &str) -> Option<&str> {
        self.actions
            .iter()
            .find(|action| action.name == name)
            .map(|action| action.url.as_str())
    }
}
