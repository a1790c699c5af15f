//! Mock identity verifier for testing.
//!
//! Implements the `IdentityVerifier` port over an in-memory table of
//! assertions, avoiding the need for a real identity provider.
//!
//! # Example
//!
//! ```ignore
//! use qrisgate::adapters::auth::MockIdentityVerifier;
//! use qrisgate::domain::VerifiedIdentity;
//!
//! let verifier = MockIdentityVerifier::new()
//!     .with_subject("valid-assertion", "uid-1");
//!
//! let identity = verifier.verify("valid-assertion").await?;
//! assert_eq!(identity.subject, "uid-1");
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{AuthError, VerifiedIdentity};
use crate::ports::IdentityVerifier;

/// Mock identity verifier.
///
/// Stores a map of assertions to identities. Assertions not in the map
/// return `InvalidAssertion`.
#[derive(Debug, Default)]
pub struct MockIdentityVerifier {
    /// Map of accepted assertions to their verified identities
    assertions: RwLock<HashMap<String, VerifiedIdentity>>,
    /// Optional error to return for all verifications (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockIdentityVerifier {
    /// Creates a new empty mock verifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assertion that verifies to the given identity.
    pub fn with_identity(self, assertion: impl Into<String>, identity: VerifiedIdentity) -> Self {
        self.assertions
            .write()
            .unwrap()
            .insert(assertion.into(), identity);
        self
    }

    /// Adds an assertion with a simple identity derived from the subject.
    pub fn with_subject(self, assertion: impl Into<String>, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        let identity = VerifiedIdentity {
            email: format!("{subject}@test.example.com"),
            name: Some(format!("Test User {subject}")),
            picture: None,
            subject,
        };
        self.with_identity(assertion, identity)
    }

    /// Forces all verifications to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Registers a new accepted assertion at runtime.
    pub fn add_assertion(&self, assertion: impl Into<String>, identity: VerifiedIdentity) {
        self.assertions
            .write()
            .unwrap()
            .insert(assertion.into(), identity);
    }

    /// Removes an assertion, making it invalid.
    pub fn remove_assertion(&self, assertion: &str) {
        self.assertions.write().unwrap().remove(assertion);
    }
}

#[async_trait]
impl IdentityVerifier for MockIdentityVerifier {
    async fn verify(&self, assertion: &str) -> Result<VerifiedIdentity, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.assertions
            .read()
            .unwrap()
            .get(assertion)
            .cloned()
            .ok_or(AuthError::InvalidAssertion)
    }
}
