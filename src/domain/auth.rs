//! Session and token types for the authentication core.
//!
//! The access token is a short-lived HS256 bearer credential. The refresh
//! token handed to clients is opaque: a signed refresh JWT, encrypted at
//! rest and base64-armored. Only the most recently issued refresh token is
//! ever valid for a user (rotation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Role, StorageError};

/// The credential pair returned by login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Short-lived bearer credential carrying user id, email, and role.
    pub access_token: String,

    /// Opaque encrypted/armored refresh credential. Never the raw JWT.
    pub refresh_token: String,

    /// Expiry of the refresh credential.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Claims carried by the access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    /// Expiry as Unix epoch seconds.
    pub exp: i64,
}

/// Claims carried by the refresh token. Deliberately minimal: the user is
/// reloaded from the store on every refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub user_id: i64,
    /// Expiry as Unix epoch seconds.
    pub exp: i64,
}

/// Errors of the session/token lifecycle.
///
/// Trust rejections (`InvalidAssertion`, `InvalidToken`,
/// `RefreshTokenMismatch`) are surfaced as stable kinds and never carry
/// internal detail. `UserNotRegistered` is intentionally distinct from the
/// trust rejections so callers can prompt registration.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The identity assertion failed verification at the provider.
    #[error("invalid or expired identity assertion")]
    InvalidAssertion,

    /// Registration attempted for a subject id that already has a user.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Login attempted for a subject id with no user row.
    #[error("user not registered, please complete registration")]
    UserNotRegistered,

    /// The presented token is malformed, undecryptable, unsigned by us,
    /// or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// No refresh credential is stored for the token's user.
    #[error("refresh token not found")]
    RefreshTokenNotFound,

    /// The presented refresh token is not the most recently issued one.
    /// This is the replay-defense rejection.
    #[error("refresh token has been superseded")]
    RefreshTokenMismatch,

    /// A user id resolved from a valid token no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Signing or encrypting a fresh credential failed. Internal fault,
    /// never caused by caller input.
    #[error("token issuance failed: {0}")]
    TokenIssuance(String),

    /// The identity provider could not be reached. Transient; retry at
    /// the HTTP layer may succeed.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Opaque persistence failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Returns true if the caller should discard its credentials and start
    /// a fresh login.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken
                | AuthError::RefreshTokenNotFound
                | AuthError::RefreshTokenMismatch
                | AuthError::UserNotFound
        )
    }
}
