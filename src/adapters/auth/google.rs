//! Google OIDC adapter for identity-assertion verification.
//!
//! Implements the `IdentityVerifier` port against Google Sign-In ID
//! tokens. An assertion is accepted only after:
//!
//! 1. Fetching Google's JWKS from the certs endpoint (cached)
//! 2. Validating the RS256 signature against the matching key
//! 3. Validating issuer, audience, and expiry claims
//! 4. Mapping claims to the domain `VerifiedIdentity` type
//!
//! # Example
//!
//! ```ignore
//! use qrisgate::adapters::auth::{GoogleConfig, GoogleIdentityVerifier};
//! use qrisgate::ports::IdentityVerifier;
//!
//! let verifier = GoogleIdentityVerifier::new(GoogleConfig::new("my-client-id"));
//! let identity = verifier.verify("eyJ...").await?;
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::domain::{AuthError, VerifiedIdentity};
use crate::ports::IdentityVerifier;

/// Google's default token issuer.
const GOOGLE_ISSUER: &str = "https://accounts.google.com";

/// Google's JWKS endpoint.
const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Default JWKS cache lifetime.
const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(3600);

/// Configuration for the Google OIDC adapter.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Expected audience claim: the OAuth client id of the frontend that
    /// obtained the assertion.
    pub audience: String,

    /// Expected issuer URL. Google ID tokens carry it both with and without
    /// the scheme, so validation accepts both forms.
    pub issuer_url: String,

    /// Override for the JWKS endpoint (used by tests).
    pub certs_url: Option<String>,

    /// How long to cache the JWKS before refetching.
    pub jwks_cache_duration: Option<Duration>,
}

impl GoogleConfig {
    /// Create a new configuration for the given OAuth client id.
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            issuer_url: GOOGLE_ISSUER.to_string(),
            certs_url: None,
            jwks_cache_duration: None,
        }
    }

    /// Build the adapter configuration from the application auth section.
    pub fn from_auth(config: &AuthConfig) -> Self {
        Self {
            audience: config.audience.clone(),
            issuer_url: config.issuer_url.clone(),
            certs_url: None,
            jwks_cache_duration: None,
        }
    }

    /// Point JWKS fetches at a custom endpoint.
    pub fn with_certs_url(mut self, url: impl Into<String>) -> Self {
        self.certs_url = Some(url.into());
        self
    }

    /// Set a custom JWKS cache duration.
    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = Some(duration);
        self
    }

    fn certs_url(&self) -> &str {
        self.certs_url.as_deref().unwrap_or(GOOGLE_CERTS_URL)
    }
}

/// Claims of a Google ID token that the engine consumes.
#[derive(Debug, Deserialize)]
struct GoogleClaims {
    /// Subject - the Google account id
    sub: String,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    picture: Option<String>,
}

/// Cached JWKS with expiry tracking.
struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
}

impl JwksCache {
    fn is_expired(&self, cache_duration: Duration) -> bool {
        self.fetched_at.elapsed() > cache_duration
    }
}

/// `IdentityVerifier` implementation backed by Google Sign-In.
pub struct GoogleIdentityVerifier {
    config: GoogleConfig,
    http_client: reqwest::Client,
    jwks_cache: RwLock<Option<JwksCache>>,
}

impl GoogleIdentityVerifier {
    /// Create a new verifier with the given configuration.
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            jwks_cache: RwLock::new(None),
        }
    }

    /// Returns the decoding key for the given key id, refetching the JWKS
    /// if the cache is cold, expired, or lacks the key.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let cache_duration = self
            .config
            .jwks_cache_duration
            .unwrap_or(DEFAULT_CACHE_DURATION);

        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if !cached.is_expired(cache_duration) {
                    if let Some(jwk) = cached.jwks.find(kid) {
                        return DecodingKey::from_jwk(jwk)
                            .map_err(|_| AuthError::InvalidAssertion);
                    }
                }
            }
        }

        // Cold, expired, or key rolled over: refetch.
        let jwks: JwkSet = self
            .http_client
            .get(self.config.certs_url())
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?;

        let key = jwks
            .find(kid)
            .ok_or(AuthError::InvalidAssertion)
            .and_then(|jwk| DecodingKey::from_jwk(jwk).map_err(|_| AuthError::InvalidAssertion));

        *self.jwks_cache.write().await = Some(JwksCache {
            jwks,
            fetched_at: Instant::now(),
        });

        key
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.audience]);
        // Accept the issuer with and without the scheme; Google emits both.
        let bare_issuer = self
            .config
            .issuer_url
            .trim_start_matches("https://")
            .to_string();
        validation.set_issuer(&[self.config.issuer_url.clone(), bare_issuer]);
        validation
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, assertion: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(assertion).map_err(|_| AuthError::InvalidAssertion)?;
        let kid = header.kid.ok_or(AuthError::InvalidAssertion)?;

        let key = self.decoding_key(&kid).await?;
        let data = decode::<GoogleClaims>(assertion, &key, &self.validation())
            .map_err(|_| AuthError::InvalidAssertion)?;

        Ok(map_claims(data.claims))
    }
}

/// Maps verified Google claims to the domain identity type.
fn map_claims(claims: GoogleClaims) -> VerifiedIdentity {
    VerifiedIdentity {
        subject: claims.sub,
        email: claims.email.unwrap_or_default(),
        name: claims.name,
        picture: claims.picture,
    }
}
