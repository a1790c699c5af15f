//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Midtrans Core API sandbox base URL.
const SANDBOX_BASE_URL: &str = "https://api.sandbox.midtrans.com";

/// Midtrans Core API production base URL.
const PRODUCTION_BASE_URL: &str = "https://api.midtrans.com";

/// Payment configuration (Midtrans)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Midtrans server key. Authenticates charge requests and is the shared
    /// secret for webhook signature verification.
    pub server_key: SecretString,

    /// Whether to call the production environment instead of the sandbox
    #[serde(default)]
    pub is_production: bool,

    /// Override for the API base URL (used by tests)
    #[serde(default)]
    pub base_url_override: Option<String>,
}

impl PaymentConfig {
    /// Base URL of the Midtrans Core API for the configured environment.
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.base_url_override {
            return url;
        }
        if self.is_production {
            PRODUCTION_BASE_URL
        } else {
            SANDBOX_BASE_URL
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.server_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_SERVER_KEY"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_base_url_by_default() {
        let config = PaymentConfig {
            server_key: SecretString::new("SB-Mid-server-xxx".to_string()),
            is_production: false,
            base_url_override: None,
        };
        assert_eq!(config.base_url(), "https://api.sandbox.midtrans.com");
    }

    #[test]
    fn test_production_base_url() {
        let config = PaymentConfig {
            server_key: SecretString::new("Mid-server-xxx".to_string()),
            is_production: true,
            base_url_override: None,
        };
        assert_eq!(config.base_url(), "https://api.midtrans.com");
    }

    #[test]
    fn test_override_wins() {
        let config = PaymentConfig {
            server_key: SecretString::new("k".to_string()),
            is_production: true,
            base_url_override: Some("http://localhost:9090".to_string()),
        };
        assert_eq!(config.base_url(), "http://localhost:9090");
    }

    #[test]
    fn test_validation_missing_server_key() {
        let config = PaymentConfig {
            server_key: SecretString::new(String::new()),
            is_production: false,
            base_url_override: None,
        };
        assert!(config.validate().is_err());
    }
}
