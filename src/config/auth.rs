//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration
///
/// Holds the identity-provider settings, the HS256 signing secrets for the
/// access and refresh tokens, and the passphrase the refresh-token cipher
/// derives its key from. Secrets are wrapped in [`SecretString`] so they do
/// not appear in debug output or logs.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// OIDC issuer URL of the identity provider
    #[serde(default = "default_issuer")]
    pub issuer_url: String,

    /// Expected audience (OAuth client id) of incoming identity assertions
    pub audience: String,

    /// HS256 secret for access tokens
    pub access_secret: SecretString,

    /// HS256 secret for refresh tokens
    pub refresh_secret: SecretString,

    /// Passphrase the refresh-token cipher key is derived from
    pub cipher_passphrase: SecretString,

    /// Access token lifetime in minutes
    #[serde(default = "default_access_minutes")]
    pub access_token_minutes: i64,

    /// Refresh token lifetime in days
    #[serde(default = "default_refresh_days")]
    pub refresh_token_days: i64,
}

fn default_issuer() -> String {
    "https://accounts.google.com".to_string()
}

fn default_access_minutes() -> i64 {
    100
}

fn default_refresh_days() -> i64 {
    7
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_AUDIENCE"));
        }
        if self.access_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_ACCESS_SECRET"));
        }
        if self.refresh_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_REFRESH_SECRET"));
        }
        if self.cipher_passphrase.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_CIPHER_PASSPHRASE"));
        }
        if self.access_secret.expose_secret() == self.refresh_secret.expose_secret() {
            return Err(ValidationError::SharedTokenSecrets);
        }
        if !self.issuer_url.starts_with("https://") {
            return Err(ValidationError::IssuerMustBeHttps);
        }
        if self.access_token_minutes <= 0 || self.refresh_token_days <= 0 {
            return Err(ValidationError::InvalidTokenLifetime);
        }
        Ok(())
    }
}
