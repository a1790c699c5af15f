//! Refresh-credential store port.
//!
//! At most one live refresh credential exists per user. Login inserts or
//! replaces it; refresh rotates it with a compare-and-swap; logout deletes
//! it. All rotation atomicity lives behind this port: the engine performs
//! no in-process locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::StorageError;

/// The stored refresh credential for one user.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub user_id: i64,
    /// Opaque encrypted/armored token, byte-identical to what the client
    /// was handed.
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a conditional rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateOutcome {
    /// The stored token matched and was replaced.
    Rotated,
    /// No credential row exists for the user.
    Missing,
    /// A credential exists but its value differs from the expected one
    /// (superseded token, or a concurrent rotation won the race).
    Mismatch,
}

/// Persistence operations for refresh credentials.
///
/// # Contract
///
/// - `upsert` atomically inserts or replaces the single row per user
/// - `rotate` must be a single atomic conditional write: replace the row
///   only if its current token equals `current_token`, and report which of
///   the three outcomes occurred
/// - `delete` of an absent row is success, not an error (logout idempotence)
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Fetch the stored credential for a user.
    async fn find(&self, user_id: i64) -> Result<Option<RefreshTokenRecord>, StorageError>;

    /// Insert or replace the user's credential.
    async fn upsert(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Replace the credential only if the stored value equals
    /// `current_token`.
    async fn rotate(
        &self,
        user_id: i64,
        current_token: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RotateOutcome, StorageError>;

    /// Delete the user's credential, succeeding if none exists.
    async fn delete(&self, user_id: i64) -> Result<(), StorageError>;
}
