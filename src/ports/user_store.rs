//! User store port.

use async_trait::async_trait;

use crate::domain::{LoginHistoryEntry, Role, StorageError, User};

/// A user to be created. The store assigns the numeric id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub google_uid: String,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub role: Role,
}

/// Fields a profile update may change. The subject id is immutable and
/// deliberately absent.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub picture: Option<String>,
}

/// Persistence operations for users and their login history.
///
/// # Contract
///
/// - `create` must enforce uniqueness of `google_uid` at the storage layer
/// - `find_*` return `Ok(None)` for missing rows, reserving errors for faults
/// - `insert_login_history` is append-only
/// - `delete` cascades login history and refresh credentials
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by external-provider subject id.
    async fn find_by_subject(&self, google_uid: &str) -> Result<Option<User>, StorageError>;

    /// Look up a user by internal id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError>;

    /// Create a user and return it with its assigned id.
    async fn create(&self, user: NewUser) -> Result<User, StorageError>;

    /// List all users.
    async fn list(&self) -> Result<Vec<User>, StorageError>;

    /// Update profile fields of an existing user.
    async fn update(&self, id: i64, update: UserUpdate) -> Result<(), StorageError>;

    /// Delete a user, cascading owned rows.
    async fn delete(&self, id: i64) -> Result<(), StorageError>;

    /// Set the logged-in flag.
    async fn update_login_state(&self, id: i64, logged_in: bool) -> Result<(), StorageError>;

    /// Append one login-history record.
    async fn insert_login_history(&self, entry: LoginHistoryEntry) -> Result<(), StorageError>;
}
