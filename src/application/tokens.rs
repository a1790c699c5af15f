//! Access and refresh token issuance.
//!
//! Both tokens are HS256 JWTs signed with separate secrets. The access
//! token is handed to clients as-is; the refresh token never leaves the
//! engine unencrypted (see `SessionEngine`).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::config::AuthConfig;
use crate::domain::{AccessClaims, AuthError, RefreshClaims, User};

/// Issues and verifies the engine's own JWTs.
#[derive(Clone)]
pub struct JwtIssuer {
    access_secret: SecretString,
    refresh_secret: SecretString,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl JwtIssuer {
    /// Creates an issuer from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            access_lifetime: Duration::minutes(config.access_token_minutes),
            refresh_lifetime: Duration::days(config.refresh_token_days),
        }
    }

    /// Issues a short-lived access token carrying user id, email, and role.
    pub fn issue_access_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = AccessClaims {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + self.access_lifetime).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.access_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::TokenIssuance(e.to_string()))
    }

    /// Issues a long-lived refresh token for the user id, returning the
    /// signed token and its expiry.
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<(String, DateTime<Utc>), AuthError> {
        let expires_at = Utc::now() + self.refresh_lifetime;
        let claims = RefreshClaims {
            user_id,
            exp: expires_at.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.refresh_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;
        Ok((token, expires_at))
    }

    /// Verifies a refresh token's signature and expiry, returning its
    /// claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for a bad signature, wrong
    /// algorithm, or expired token.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.refresh_secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }

    /// Verifies an access token, returning its claims. Used by the HTTP
    /// layer's bearer middleware.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.access_secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn test_issuer() -> JwtIssuer {
        JwtIssuer {
            access_secret: SecretString::new("access-secret".to_string()),
            refresh_secret: SecretString::new("refresh-secret".to_string()),
            access_lifetime: Duration::minutes(100),
            refresh_lifetime: Duration::days(7),
        }
    }

    fn test_user() -> User {
        User {
            id: 42,
            google_uid: "uid-42".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            picture: None,
            role: Role::User,
            logged_in: false,
        }
    }

    #[test]
    fn access_token_round_trips() {
        let issuer = test_issuer();
        let token = issuer.issue_access_token(&test_user()).unwrap();

        let claims = issuer.verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn refresh_token_round_trips() {
        let issuer = test_issuer();
        let (token, expires_at) = issuer.issue_refresh_token(42).unwrap();

        let claims = issuer.verify_refresh_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn refresh_token_rejected_by_access_secret() {
        let issuer = test_issuer();
        let (token, _) = issuer.issue_refresh_token(42).unwrap();

        // Access and refresh secrets differ; crossing them must fail.
        assert!(matches!(
            issuer.verify_access_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_refresh_token_is_rejected() {
        let issuer = test_issuer();
        let claims = RefreshClaims {
            user_id: 42,
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("refresh-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            issuer.verify_refresh_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let issuer = test_issuer();
        assert!(matches!(
            issuer.verify_refresh_token("not-a-jwt"),
            Err(AuthError::InvalidToken)
        ));
    }
}
