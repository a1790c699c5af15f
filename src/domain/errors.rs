//! Shared persistence error type.

use thiserror::Error;

/// Opaque persistence failure surfaced by the stores.
///
/// The engines never inspect the message; they only branch on `NotFound`
/// where an operation must distinguish a missing row from a database fault.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The requested row does not exist.
    #[error("record not found")]
    NotFound,

    /// Any other database failure, carried as an opaque message.
    #[error("database error: {0}")]
    Database(String),
}

impl StorageError {
    /// Creates a database error from any displayable source.
    pub fn database(source: impl std::fmt::Display) -> Self {
        StorageError::Database(source.to_string())
    }
}
