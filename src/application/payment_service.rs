//! Payment service: QRIS transaction creation and webhook reconciliation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    NotificationPayload, NotificationVerifier, OrderRequest, PaymentError, PaymentReceipt,
    StorageError, Transaction, TransactionDetail, TransactionStatus,
};
use crate::ports::{ChargeRequest, ItemDetail, PaymentProvider, TransactionStore};

/// Action name the provider uses for the QR-code URL in charge responses.
const QR_ACTION: &str = "generate-qr-code";

/// Payment method tag stored on transactions created by this service.
const PAYMENT_TYPE: &str = "qris";

/// Creates QRIS transactions and reconciles provider notifications.
pub struct PaymentService {
    provider: Arc<dyn PaymentProvider>,
    transactions: Arc<dyn TransactionStore>,
    notification_verifier: NotificationVerifier,
}

impl PaymentService {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        transactions: Arc<dyn TransactionStore>,
        notification_verifier: NotificationVerifier,
    ) -> Self {
        Self {
            provider,
            transactions,
            notification_verifier,
        }
    }

    /// Creates a QRIS transaction for the given order.
    ///
    /// The gross amount is always recomputed server-side as the sum of
    /// `price * quantity` over the line items; any client-supplied total is
    /// ignored by construction (the request type carries none). The header
    /// and detail rows are persisted in one atomic unit.
    ///
    /// # Errors
    ///
    /// - `ProviderChargeFailed` if the charge is refused or the response
    ///   carries no QR action
    /// - `Storage` if persistence fails (no partial rows remain)
    pub async fn create_transaction(
        &self,
        order: OrderRequest,
        user_id: i64,
    ) -> Result<PaymentReceipt, PaymentError> {
        let order_id = format!("ORDER-{}", Uuid::new_v4());

        let mut gross_amount: i64 = 0;
        let mut details = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let subtotal = item.subtotal();
            gross_amount += subtotal;
            details.push(TransactionDetail {
                order_id: order_id.clone(),
                product_name: item.product_name.clone(),
                price: item.price,
                quantity: item.quantity,
                subtotal,
            });
        }

        let response = self
            .provider
            .charge(ChargeRequest {
                order_id: order_id.clone(),
                gross_amount,
                items: order
                    .items
                    .iter()
                    .map(|item| ItemDetail {
                        name: item.product_name.clone(),
                        price: item.price,
                        quantity: item.quantity,
                    })
                    .collect(),
            })
            .await?;

        let qr_url = response
            .action_url(QR_ACTION)
            .ok_or_else(|| {
                PaymentError::ProviderChargeFailed(format!(
                    "charge response carries no {QR_ACTION} action"
                ))
            })?
            .to_string();

        let status = TransactionStatus::parse(&response.transaction_status)
            .unwrap_or(TransactionStatus::Pending);

        let now = Utc::now();
        let transaction = Transaction {
            order_id: order_id.clone(),
            user_id,
            amount: gross_amount,
            status,
            payment_type: PAYMENT_TYPE.to_string(),
            payment_url: qr_url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.transactions
            .save_with_details(&transaction, &details)
            .await?;

        Ok(PaymentReceipt {
            order_id,
            amount: gross_amount.to_string(),
            qr_url,
            status,
        })
    }

    /// Handles an asynchronous status notification from the provider.
    ///
    /// The payload authenticates itself solely through its signature key;
    /// this entry point is reachable without a session. A forged payload is
    /// rejected before any field of it is acted on.
    ///
    /// # Errors
    ///
    /// - `SignatureMismatch` for a forged or tampered payload
    /// - `TransactionNotFound` if the order id has no transaction
    pub async fn handle_notification(
        &self,
        payload: NotificationPayload,
    ) -> Result<(), PaymentError> {
        self.notification_verifier.verify(&payload)?;

        let status = TransactionStatus::from_notification(
            &payload.transaction_status,
            &payload.fraud_status,
        );

        self.transactions
            .update_status(&payload.order_id, status)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => PaymentError::TransactionNotFound(payload.order_id),
                other => PaymentError::Storage(other),
            })
    }
}
