//! Payment-notification signature verification.
//!
//! The provider signs every webhook with
//! `SHA-512(order_id || status_code || gross_amount || server_key)`,
//! hex-encoded in the `signature_key` field. This is the sole authentication
//! mechanism for the webhook endpoint, which is reachable without a session.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use super::{NotificationPayload, PaymentError};

/// Verifier for provider notification signatures.
pub struct NotificationVerifier {
    /// The merchant server key shared with the provider.
    server_key: SecretString,
}

impl NotificationVerifier {
    /// Creates a new verifier with the given server key.
    pub fn new(server_key: SecretString) -> Self {
        Self { server_key }
    }

    /// Verifies the payload's `signature_key`.
    ///
    /// Recomputes the expected signature from the payload fields and the
    /// server key, and compares it with the presented one in constant time.
    /// No other field of the payload is given any trust before this check
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::SignatureMismatch` if the signatures differ.
    pub fn verify(&self, payload: &NotificationPayload) -> Result<(), PaymentError> {
        let expected = self.compute_signature(
            &payload.order_id,
            &payload.status_code,
            &payload.gross_amount,
        );

        if !constant_time_compare(expected.as_bytes(), payload.signature_key.as_bytes()) {
            return Err(PaymentError::SignatureMismatch);
        }

        Ok(())
    }

    /// Computes the hex-encoded SHA-512 over the concatenated fields.
    fn compute_signature(&self, order_id: &str, status_code: &str, gross_amount: &str) -> String {
        let mut hasher = Sha512::new();
        hasher.update(order_id.as_bytes());
        hasher.update(status_code.as_bytes());
        hasher.update(gross_amount.as_bytes());
        hasher.update(self.server_key.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// Prevents timing leaks about the expected signature.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a valid signature for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(
    server_key: &str,
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_KEY: &str = "SB-Mid-server-test-key";

    fn payload_with_signature(signature_key: String) -> NotificationPayload {
        NotificationPayload {
            order_id: "ORDER-a1b2".to_string(),
            transaction_status: "settlement".to_string(),
            fraud_status: String::new(),
            status_code: "200".to_string(),
            gross_amount: "2500.00".to_string(),
            signature_key,
        }
    }

    fn valid_payload() -> NotificationPayload {
        payload_with_signature(compute_test_signature(
            TEST_KEY,
            "ORDER-a1b2",
            "200",
            "2500.00",
        ))
    }

    #[test]
    fn verify_accepts_valid_signature() {
        let verifier = NotificationVerifier::new(SecretString::new(TEST_KEY.to_string()));
        assert!(verifier.verify(&valid_payload()).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_server_key() {
        let verifier = NotificationVerifier::new(SecretString::new("other-key".to_string()));
        assert!(matches!(
            verifier.verify(&valid_payload()),
            Err(PaymentError::SignatureMismatch)
        ));
    }

    #[test]
    fn verify_rejects_tampered_gross_amount() {
        let verifier = NotificationVerifier::new(SecretString::new(TEST_KEY.to_string()));
        let mut payload = valid_payload();
        payload.gross_amount = "1.00".to_string();
        assert!(matches!(
            verifier.verify(&payload),
            Err(PaymentError::SignatureMismatch)
        ));
    }

    #[test]
    fn verify_rejects_truncated_signature() {
        let verifier = NotificationVerifier::new(SecretString::new(TEST_KEY.to_string()));
        let mut payload = valid_payload();
        payload.signature_key.truncate(64);
        assert!(matches!(
            verifier.verify(&payload),
            Err(PaymentError::SignatureMismatch)
        ));
    }

    #[test]
    fn constant_time_compare_handles_length_mismatch() {
        assert!(!constant_time_compare(b"abc", b"abcd"));
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(constant_time_compare(b"", b""));
    }

    proptest! {
        /// Any single-character corruption of the signature must be rejected.
        #[test]
        fn any_corrupted_signature_is_rejected(pos in 0usize..128, replacement in "[0-9a-f]") {
            let verifier = NotificationVerifier::new(SecretString::new(TEST_KEY.to_string()));
            let valid = compute_test_signature(TEST_KEY, "ORDER-a1b2", "200", "2500.00");

            let mut corrupted: Vec<char> = valid.chars().collect();
            let replacement = replacement.chars().next().unwrap();
            prop_assume!(corrupted[pos] != replacement);
            corrupted[pos] = replacement;

            let payload = payload_with_signature(corrupted.into_iter().collect());
            prop_assert!(matches!(
                verifier.verify(&payload),
                Err(PaymentError::SignatureMismatch)
            ));
        }
    }
}
