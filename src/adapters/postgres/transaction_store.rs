//! PostgreSQL implementation of TransactionStore.
//!
//! Expects the tables:
//!
//! ```sql
//! transactions (order_id text PK, user_id bigint REFERENCES users,
//!               amount bigint, status text, payment_type text,
//!               payment_url text, created_at timestamptz,
//!               updated_at timestamptz)
//! transaction_details (id bigserial PK, order_id text REFERENCES
//!                      transactions ON DELETE CASCADE, product_name text,
//!                      price bigint, quantity integer, subtotal bigint)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{StorageError, Transaction, TransactionDetail, TransactionStatus};
use crate::ports::TransactionStore;

use super::map_sqlx_error;

/// PostgreSQL implementation of the TransactionStore port.
pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    order_id: String,
    user_id: i64,
    amount: i64,
    status: String,
    payment_type: String,
    payment_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StorageError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let status = TransactionStatus::parse(&row.status).ok_or_else(|| {
            StorageError::Database(format!("invalid status value: {}", row.status))
        })?;
        Ok(Transaction {
            order_id: row.order_id,
            user_id: row.user_id,
            amount: row.amount,
            status,
            payment_type: row.payment_type,
            payment_url: row.payment_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn save_with_details(
        &self,
        transaction: &Transaction,
        details: &[TransactionDetail],
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            "INSERT INTO transactions \
             (order_id, user_id, amount, status, payment_type, payment_url, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&transaction.order_id)
        .bind(transaction.user_id)
        .bind(transaction.amount)
        .bind(transaction.status.as_str())
        .bind(&transaction.payment_type)
        .bind(&transaction.payment_url)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for detail in details {
            sqlx::query(
                "INSERT INTO transaction_details \
                 (order_id, product_name, price, quantity, subtotal) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&detail.order_id)
            .bind(&detail.product_name)
            .bind(detail.price)
            .bind(i64::from(detail.quantity))
            .bind(detail.subtotal)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: TransactionStatus,
    ) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE transactions SET status = $1, updated_at = $2 WHERE order_id = $3",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(order_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Transaction>, StorageError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT order_id, user_id, amount, status, payment_type, payment_url, \
             created_at, updated_at \
             FROM transactions WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.map(Transaction::try_from).transpose()
    }
}
