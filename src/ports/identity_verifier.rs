//! Identity verifier port.
//!
//! The session engine treats the external identity provider as a black box
//! with a pass/fail plus claims-extraction contract. Verification of the
//! assertion's cryptographic signature is entirely the provider's concern.

use async_trait::async_trait;

use crate::domain::{AuthError, VerifiedIdentity};

/// Verifies opaque identity assertions from the external provider.
///
/// # Contract
///
/// Implementations must:
/// - Return the verified subject id and claims for a genuine assertion
/// - Return `AuthError::InvalidAssertion` for any assertion that fails
///   signature, issuer, audience, or expiry checks
/// - Never partially trust an unverified assertion
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify an identity assertion and extract its claims.
    async fn verify(&self, assertion: &str) -> Result<VerifiedIdentity, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    struct TableVerifier {
        assertions: RwLock<HashMap<String, VerifiedIdentity>>,
    }

    #[async_trait]
    impl IdentityVerifier for TableVerifier {
        async fn verify(&self, assertion: &str) -> Result<VerifiedIdentity, AuthError> {
            self.assertions
                .read()
                .unwrap()
                .get(assertion)
                .cloned()
                .ok_or(AuthError::InvalidAssertion)
        }
    }

    #[tokio::test]
    async fn verifier_returns_claims_for_known_assertion() {
        let verifier = TableVerifier {
            assertions: RwLock::new(HashMap::from([(
                "good-token".to_string(),
                VerifiedIdentity {
                    subject: "uid-1".to_string(),
                    email: "a@example.com".to_string(),
                    name: Some("Alice".to_string()),
                    picture: None,
                },
            )])),
        };

        let identity = verifier.verify("good-token").await.unwrap();
        assert_eq!(identity.subject, "uid-1");
    }

    #[tokio::test]
    async fn verifier_rejects_unknown_assertion() {
        let verifier = TableVerifier {
            assertions: RwLock::new(HashMap::new()),
        };

        assert!(matches!(
            verifier.verify("forged").await,
            Err(AuthError::InvalidAssertion)
        ));
    }

    #[test]
    fn verifier_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn IdentityVerifier) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn IdentityVerifier>>();
    }
}
