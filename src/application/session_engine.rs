//! The session/token engine.
//!
//! Turns a verified external identity into a local session and manages the
//! credential-rotation lifecycle: registration, login, refresh exchange,
//! and logout. The refresh token handed to clients is the signed refresh
//! JWT encrypted and armored by the `TokenCipher`; only the most recently
//! issued value is ever accepted back.

use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::warn;

use crate::domain::{
    AuthError, LoginHistoryEntry, Role, TokenPair, User, VerifiedIdentity,
};
use crate::ports::{
    IdentityVerifier, NewUser, RefreshTokenStore, RotateOutcome, TokenCipher, UserStore,
};

use super::tokens::JwtIssuer;

/// Orchestrates identity verification, user provisioning, and the
/// access/refresh token lifecycle.
pub struct SessionEngine {
    identity: Arc<dyn IdentityVerifier>,
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    cipher: Arc<dyn TokenCipher>,
    jwt: JwtIssuer,
}

impl SessionEngine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        identity: Arc<dyn IdentityVerifier>,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        cipher: Arc<dyn TokenCipher>,
        jwt: JwtIssuer,
    ) -> Self {
        Self {
            identity,
            users,
            refresh_tokens,
            cipher,
            jwt,
        }
    }

    /// Registers a new user from a verified identity assertion.
    ///
    /// The display name is `display_name_override` when non-empty,
    /// otherwise the claim-provided name. No tokens are issued; the caller
    /// follows up with [`SessionEngine::login`].
    ///
    /// # Errors
    ///
    /// - `InvalidAssertion` if verification fails
    /// - `UserAlreadyExists` if the subject id already has a user
    pub async fn register(
        &self,
        assertion: &str,
        display_name_override: Option<&str>,
    ) -> Result<User, AuthError> {
        let identity = self.identity.verify(assertion).await?;

        if self.users.find_by_subject(&identity.subject).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let name = match display_name_override {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => identity.display_name().to_string(),
        };

        let user = self
            .users
            .create(NewUser {
                google_uid: identity.subject.clone(),
                name,
                email: identity.email.clone(),
                picture: identity.picture.clone(),
                role: Role::User,
            })
            .await?;

        Ok(user)
    }

    /// Logs a registered user in, issuing a fresh access/refresh pair.
    ///
    /// The login-history write is best-effort: a failure is logged and the
    /// login proceeds. Re-login without logout is permitted; the stored
    /// refresh credential is rotated in place, so the previous refresh
    /// token stops working.
    ///
    /// # Errors
    ///
    /// - `InvalidAssertion` if verification fails
    /// - `UserNotRegistered` if no user exists for the subject id
    pub async fn login(
        &self,
        assertion: &str,
        device_info: &str,
        ip_address: &str,
    ) -> Result<TokenPair, AuthError> {
        let identity = self.identity.verify(assertion).await?;
        let user = self.lookup_registered(&identity).await?;

        if let Err(e) = self
            .users
            .insert_login_history(LoginHistoryEntry::now(user.id, device_info, ip_address))
            .await
        {
            warn!(user_id = user.id, error = %e, "failed to record login history");
        }

        self.users.update_login_state(user.id, true).await?;

        let pair = self.mint_pair(&user)?;
        self.refresh_tokens
            .upsert(user.id, &pair.refresh_token, pair.refresh_expires_at)
            .await?;

        Ok(pair)
    }

    /// Exchanges a refresh token for a fresh access/refresh pair,
    /// rotating the stored credential.
    ///
    /// Only the most recently issued refresh token is accepted: a
    /// superseded value fails with `RefreshTokenMismatch`, which is the
    /// replay defense. The final write is a compare-and-swap on the
    /// previous value, so two concurrent exchanges of the same token
    /// cannot both succeed.
    pub async fn refresh(&self, opaque_token: &str) -> Result<TokenPair, AuthError> {
        // Any de-armoring or decryption failure means the caller did not
        // present a token we issued.
        let plaintext = self
            .cipher
            .decrypt(opaque_token)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims = self.jwt.verify_refresh_token(&plaintext)?;

        let stored = self
            .refresh_tokens
            .find(claims.user_id)
            .await?
            .ok_or(AuthError::RefreshTokenNotFound)?;

        if !bool::from(stored.token.as_bytes().ct_eq(opaque_token.as_bytes())) {
            return Err(AuthError::RefreshTokenMismatch);
        }

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let pair = self.mint_pair(&user)?;
        match self
            .refresh_tokens
            .rotate(
                user.id,
                opaque_token,
                &pair.refresh_token,
                pair.refresh_expires_at,
            )
            .await?
        {
            RotateOutcome::Rotated => Ok(pair),
            RotateOutcome::Missing => Err(AuthError::RefreshTokenNotFound),
            // A concurrent exchange rotated first; this token is now stale.
            RotateOutcome::Mismatch => Err(AuthError::RefreshTokenMismatch),
        }
    }

    /// Logs a user out: clears the login flag and deletes the refresh
    /// credential. Idempotent; logging out twice succeeds both times.
    pub async fn logout(&self, user_id: i64) -> Result<(), AuthError> {
        self.users.update_login_state(user_id, false).await?;
        self.refresh_tokens.delete(user_id).await?;
        Ok(())
    }

    async fn lookup_registered(&self, identity: &VerifiedIdentity) -> Result<User, AuthError> {
        self.users
            .find_by_subject(&identity.subject)
            .await?
            .ok_or(AuthError::UserNotRegistered)
    }

    /// Issues an access token and an encrypted, armored refresh token.
    fn mint_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access_token = self.jwt.issue_access_token(user)?;
        let (refresh_jwt, refresh_expires_at) = self.jwt.issue_refresh_token(user.id)?;
        let refresh_token = self
            .cipher
            .encrypt(&refresh_jwt)
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }
}
