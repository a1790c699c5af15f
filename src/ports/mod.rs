//! Ports (trait seams) between the engines and their collaborators.
//!
//! Every external dependency of the session and payment cores is reached
//! through one of these object-safe async traits: identity verification,
//! persistence, at-rest encryption, and the payment provider. Adapters live
//! in `crate::adapters`; tests supply in-memory implementations.

mod identity_verifier;
mod payment_provider;
mod refresh_token_store;
mod token_cipher;
mod transaction_store;
mod user_store;

pub use identity_verifier::IdentityVerifier;
pub use payment_provider::{ChargeAction, ChargeRequest, ChargeResponse, ItemDetail, PaymentProvider};
pub use refresh_token_store::{RefreshTokenRecord, RefreshTokenStore, RotateOutcome};
pub use token_cipher::{CipherError, TokenCipher};
pub use transaction_store::TransactionStore;
pub use user_store::{NewUser, UserStore, UserUpdate};
