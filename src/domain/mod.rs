//! Domain types for the session and payment cores.
//!
//! Everything in this module is provider-independent: no sqlx, reqwest, or
//! framework types leak in. Adapters map their wire/row representations into
//! these types at the boundary.

mod auth;
mod errors;
mod login_history;
mod signature;
mod transaction;
mod user;

pub use auth::{AccessClaims, AuthError, RefreshClaims, TokenPair};
pub use errors::StorageError;
pub use login_history::LoginHistoryEntry;
pub use signature::NotificationVerifier;
pub use transaction::{
    NotificationPayload, OrderItem, OrderRequest, PaymentError, PaymentReceipt, Transaction,
    TransactionDetail, TransactionStatus,
};
pub use user::{Role, User, VerifiedIdentity};

#[cfg(test)]
pub use signature::compute_test_signature;
