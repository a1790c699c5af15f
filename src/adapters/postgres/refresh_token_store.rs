//! PostgreSQL implementation of RefreshTokenStore.
//!
//! Expects the table:
//!
//! ```sql
//! refresh_tokens (user_id bigint PK REFERENCES users ON DELETE CASCADE,
//!                 token text NOT NULL, expires_at timestamptz NOT NULL)
//! ```
//!
//! The primary key on `user_id` enforces the one-credential-per-user
//! invariant; rotation atomicity comes from the conditional UPDATE.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::StorageError;
use crate::ports::{RefreshTokenRecord, RefreshTokenStore, RotateOutcome};

use super::map_sqlx_error;

/// PostgreSQL implementation of the RefreshTokenStore port.
pub struct PostgresRefreshTokenStore {
    pool: PgPool,
}

impl PostgresRefreshTokenStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RefreshTokenRow {
    user_id: i64,
    token: String,
    expires_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        RefreshTokenRecord {
            user_id: row.user_id,
            token: row.token,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl RefreshTokenStore for PostgresRefreshTokenStore {
    async fn find(&self, user_id: i64) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT user_id, token, expires_at FROM refresh_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(RefreshTokenRecord::from))
    }

    async fn upsert(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token, expires_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) \
             DO UPDATE SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at",
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rotate(
        &self,
        user_id: i64,
        current_token: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RotateOutcome, StorageError> {
        // Single conditional write; only the caller holding the live token
        // can win. A concurrent rotation that commits first makes this one
        // report Mismatch.
        let result = sqlx::query(
            "UPDATE refresh_tokens SET token = $1, expires_at = $2 \
             WHERE user_id = $3 AND token = $4",
        )
        .bind(new_token)
        .bind(expires_at)
        .bind(user_id)
        .bind(current_token)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 1 {
            return Ok(RotateOutcome::Rotated);
        }

        // Distinguish a missing row from a superseded token.
        match self.find(user_id).await? {
            None => Ok(RotateOutcome::Missing),
            Some(_) => Ok(RotateOutcome::Mismatch),
        }
    }

    async fn delete(&self, user_id: i64) -> Result<(), StorageError> {
        // Deleting an absent row is success: logout is idempotent.
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
