//! Payment transaction types and the provider status mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StorageError;

/// Internal status of a payment transaction.
///
/// Transitions are driven solely by verified provider notifications via
/// [`TransactionStatus::from_notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Challenge,
    Success,
    Failed,
}

impl TransactionStatus {
    /// Stable string form used in database rows and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Challenge => "challenge",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
        }
    }

    /// Parses the stable string form.
    pub fn parse(s: &str) -> Option<TransactionStatus> {
        match s {
            "pending" => Some(TransactionStatus::Pending),
            "challenge" => Some(TransactionStatus::Challenge),
            "success" => Some(TransactionStatus::Success),
            "failed" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }

    /// Maps the provider's `(transaction_status, fraud_status)` vocabulary
    /// to the internal status. First match wins:
    ///
    /// | transaction_status      | fraud_status | internal  |
    /// |-------------------------|--------------|-----------|
    /// | capture                 | challenge    | challenge |
    /// | capture                 | accept       | success   |
    /// | settlement              | any          | success   |
    /// | deny / cancel / expire  | any          | failed    |
    /// | anything else           | any          | pending   |
    pub fn from_notification(transaction_status: &str, fraud_status: &str) -> TransactionStatus {
        match transaction_status {
            "capture" => match fraud_status {
                "challenge" => TransactionStatus::Challenge,
                "accept" => TransactionStatus::Success,
                _ => TransactionStatus::Pending,
            },
            "settlement" => TransactionStatus::Success,
            "deny" | "cancel" | "expire" => TransactionStatus::Failed,
            _ => TransactionStatus::Pending,
        }
    }
}

/// One payment attempt, correlated with the provider by `order_id`.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub order_id: String,
    pub user_id: i64,
    /// Gross amount in minor currency units. Always equals the sum of the
    /// detail subtotals; never taken from a client-supplied total.
    pub amount: i64,
    pub status: TransactionStatus,
    pub payment_type: String,
    /// Provider-hosted payment-action URL (the QR image for QRIS).
    pub payment_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line item of a transaction, with its server-computed subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionDetail {
    pub order_id: String,
    pub product_name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    pub quantity: u32,
    /// `price * quantity`, computed when the order is accepted.
    pub subtotal: i64,
}

/// Incoming order from the caller. Carries no amount field: the gross
/// amount is always recomputed server-side from the items.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
}

/// One requested line item.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    pub quantity: u32,
}

impl OrderItem {
    /// Server-side subtotal for this item.
    pub fn subtotal(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Result of creating a transaction, returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub order_id: String,
    /// Gross amount formatted as a decimal string.
    pub amount: String,
    pub qr_url: String,
    pub status: TransactionStatus,
}

/// Webhook notification payload from the payment provider.
///
/// `fraud_status` is absent for some statuses (e.g. settlement), so it
/// defaults to empty rather than failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationPayload {
    pub order_id: String,
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
}

/// Errors of the payment core.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// The notification's signature key did not match the recomputed one.
    /// The callback is rejected without touching any transaction.
    #[error("invalid signature key")]
    SignatureMismatch,

    /// The provider refused or failed the charge request, or returned a
    /// response the engine cannot act on.
    #[error("provider charge failed: {0}")]
    ProviderChargeFailed(String),

    /// A notification referenced an order id with no transaction row.
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    /// Opaque persistence failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
