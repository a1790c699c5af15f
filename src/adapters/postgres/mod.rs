//! PostgreSQL implementations of the store ports.
//!
//! Schema DDL is owned by the deployment; each adapter documents the
//! table shape it expects.

mod refresh_token_store;
mod transaction_store;
mod user_store;

pub use refresh_token_store::PostgresRefreshTokenStore;
pub use transaction_store::PostgresTransactionStore;
pub use user_store::PostgresUserStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::StorageError;

/// Opens a connection pool with the configured bounds and timeout.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
}

/// Maps sqlx failures into the opaque storage error.
fn map_sqlx_error(error: sqlx::Error) -> StorageError {
    match error {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        other => StorageError::Database(other.to_string()),
    }
}
