//! Integration tests for QRIS transaction creation and webhook
//! reconciliation.
//!
//! Exercises the payment service end to end with the mock provider and an
//! in-memory transaction store:
//! 1. Create a transaction; the gross amount comes from the line items
//! 2. A signed settlement notification marks it successful
//! 3. Forged notifications are rejected without touching state
//!
//! Signatures are computed the way the provider computes them:
//! hex(SHA-512(order_id || status_code || gross_amount || server_key)).

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use sha2::{Digest, Sha512};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use qrisgate::adapters::midtrans::MockPaymentProvider;
use qrisgate::application::PaymentService;
use qrisgate::domain::{
    NotificationPayload, NotificationVerifier, OrderItem, OrderRequest, PaymentError,
    StorageError, Transaction, TransactionDetail, TransactionStatus,
};
use qrisgate::ports::TransactionStore;

const SERVER_KEY: &str = "SB-Mid-server-integration-key";

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory transaction store for testing.
#[derive(Default)]
struct TestTransactions {
    rows: Mutex<HashMap<String, Transaction>>,
    details: Mutex<HashMap<String, Vec<TransactionDetail>>>,
}

#[async_trait]
impl TransactionStore for TestTransactions {
    async fn save_with_details(
        &self,
        transaction: &Transaction,
        details: &[TransactionDetail],
    ) -> Result<(), StorageError> {
        self.rows
            .lock()
            .unwrap()
            .insert(transaction.order_id.clone(), transaction.clone());
        self.details
            .lock()
            .unwrap()
            .insert(transaction.order_id.clone(), details.to_vec());
        Ok(())
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: TransactionStatus,
    ) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(order_id).ok_or(StorageError::NotFound)?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Transaction>, StorageError> {
        Ok(self.rows.lock().unwrap().get(order_id).cloned())
    }
}

fn sign(order_id: &str, status_code: &str, gross_amount: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(SERVER_KEY.as_bytes());
    hex::encode(hasher.finalize())
}

fn notification(order_id: &str, transaction_status: &str, fraud_status: &str) -> NotificationPayload {
    NotificationPayload {
        order_id: order_id.to_string(),
        transaction_status: transaction_status.to_string(),
        fraud_status: fraud_status.to_string(),
        status_code: "200".to_string(),
        gross_amount: "30000.00".to_string(),
        signature_key: sign(order_id, "200", "30000.00"),
    }
}

struct Harness {
    service: PaymentService,
    provider: Arc<MockPaymentProvider>,
    store: Arc<TestTransactions>,
}

fn harness() -> Harness {
    let provider = Arc::new(MockPaymentProvider::new());
    let store = Arc::new(TestTransactions::default());
    let service = PaymentService::new(
        provider.clone(),
        store.clone(),
        NotificationVerifier::new(SecretString::new(SERVER_KEY.to_string())),
    );
    Harness {
        service,
        provider,
        store,
    }
}

fn sample_order() -> OrderRequest {
    OrderRequest {
        items: vec![
            OrderItem {
                product_name: "Kopi Susu".to_string(),
                price: 12500,
                quantity: 2,
            },
            OrderItem {
                product_name: "Roti Bakar".to_string(),
                price: 5000,
                quantity: 1,
            },
        ],
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn create_transaction_computes_amount_and_stores_qr_url() {
    let h = harness();

    let receipt = h.service.create_transaction(sample_order(), 7).await.unwrap();

    assert_eq!(receipt.amount, "30000");
    assert!(!receipt.qr_url.is_empty());

    // The provider was asked to charge exactly the computed amount.
    let calls = h.provider.charge_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].gross_amount, 30000);
    assert_eq!(calls[0].order_id, receipt.order_id);

    let saved = h
        .store
        .find_by_order_id(&receipt.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.amount, 30000);
    assert_eq!(saved.payment_url, receipt.qr_url);
}

#[tokio::test]
async fn provider_failure_leaves_no_transaction() {
    let h = harness();
    h.provider
        .set_error(PaymentError::ProviderChargeFailed("gateway down".to_string()));

    let result = h.service.create_transaction(sample_order(), 7).await;
    assert!(matches!(result, Err(PaymentError::ProviderChargeFailed(_))));
    assert!(h.store.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn settlement_notification_reconciles_to_success() {
    let h = harness();
    let receipt = h.service.create_transaction(sample_order(), 7).await.unwrap();

    h.service
        .handle_notification(notification(&receipt.order_id, "settlement", ""))
        .await
        .unwrap();

    let saved = h
        .store
        .find_by_order_id(&receipt.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.status, TransactionStatus::Success);
}

#[tokio::test]
async fn capture_with_challenge_is_held_for_review() {
    let h = harness();
    let receipt = h.service.create_transaction(sample_order(), 7).await.unwrap();

    h.service
        .handle_notification(notification(&receipt.order_id, "capture", "challenge"))
        .await
        .unwrap();

    let saved = h
        .store
        .find_by_order_id(&receipt.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.status, TransactionStatus::Challenge);
}

#[tokio::test]
async fn forged_notification_is_rejected_before_any_write() {
    let h = harness();
    let receipt = h.service.create_transaction(sample_order(), 7).await.unwrap();

    let mut payload = notification(&receipt.order_id, "settlement", "");
    payload.signature_key = sign(&receipt.order_id, "200", "1.00");

    assert!(matches!(
        h.service.handle_notification(payload).await,
        Err(PaymentError::SignatureMismatch)
    ));

    let saved = h
        .store
        .find_by_order_id(&receipt.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.status, TransactionStatus::Pending);
}

#[tokio::test]
async fn notification_for_unknown_order_is_not_found() {
    let h = harness();

    let result = h
        .service
        .handle_notification(notification("ORDER-missing", "settlement", ""))
        .await;
    assert!(matches!(result, Err(PaymentError::TransactionNotFound(_))));
}

#[tokio::test]
async fn expire_notification_reconciles_to_failed() {
    let h = harness();
    let receipt = h.service.create_transaction(sample_order(), 7).await.unwrap();

    h.service
        .handle_notification(notification(&receipt.order_id, "expire", ""))
        .await
        .unwrap();

    let saved = h
        .store
        .find_by_order_id(&receipt.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.status, TransactionStatus::Failed);
}
