//! Transaction store port.

use async_trait::async_trait;

use crate::domain::{StorageError, Transaction, TransactionDetail, TransactionStatus};

/// Persistence operations for payment transactions.
///
/// # Contract
///
/// - `save_with_details` writes the header and all detail rows in one
///   all-or-nothing transactional scope; a failure mid-write leaves no rows
/// - `update_status` returns `StorageError::NotFound` for unknown order ids
///   rather than reporting silent success
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a transaction header with its line items atomically.
    async fn save_with_details(
        &self,
        transaction: &Transaction,
        details: &[TransactionDetail],
    ) -> Result<(), StorageError>;

    /// Update the status of the transaction with the given order id.
    async fn update_status(
        &self,
        order_id: &str,
        status: TransactionStatus,
    ) -> Result<(), StorageError>;

    /// Fetch a transaction by order id.
    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Transaction>, StorageError>;
}
