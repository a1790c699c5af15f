//! AES-256-GCM implementation of the token cipher.
//!
//! Encrypts refresh-token material with AES-256-GCM using a random
//! 12-byte nonce prepended to the ciphertext. Output is base64-encoded so
//! it can live in a TEXT column and travel to clients as an opaque string.
//! The 32-byte key is derived from a passphrase with SHA-256.

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, KeyInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::ports::{CipherError, TokenCipher};

/// Nonce size for AES-256-GCM (12 bytes).
const NONCE_SIZE: usize = 12;

/// GCM tag size (16 bytes).
const TAG_SIZE: usize = 16;

/// `TokenCipher` backed by AES-256-GCM.
pub struct AesGcmTokenCipher {
    cipher: Aes256Gcm,
}

impl AesGcmTokenCipher {
    /// Creates a cipher whose key is derived from the passphrase with
    /// SHA-256.
    pub fn new(passphrase: &SecretString) -> Self {
        // SHA-256 output is exactly the AES-256 key size.
        let key = Sha256::digest(passphrase.expose_secret().as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }
}

impl TokenCipher for AesGcmTokenCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptFailed(e.to_string()))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(combined))
    }

    fn decrypt(&self, opaque: &str) -> Result<String, CipherError> {
        let combined = BASE64.decode(opaque).map_err(|_| CipherError::Malformed)?;
        if combined.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::Malformed);
        }

        let (nonce, ciphertext) = combined.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(nonce.into(), ciphertext)
            .map_err(|_| CipherError::DecryptFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::DecryptFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> AesGcmTokenCipher {
        AesGcmTokenCipher::new(&SecretString::new("test-passphrase".to_string()))
    }

    #[test]
    fn round_trip_recovers_plaintext() {
        let cipher = test_cipher();
        let plaintext = "eyJhbGciOiJIUzI1NiJ9.claims.signature";

        let opaque = cipher.encrypt(plaintext).unwrap();
        assert_ne!(opaque, plaintext);
        assert_eq!(cipher.decrypt(&opaque).unwrap(), plaintext);
    }

    #[test]
    fn encrypting_twice_yields_distinct_ciphertexts() {
        let cipher = test_cipher();
        let a = cipher.encrypt("same input").unwrap();
        let b = cipher.encrypt("same input").unwrap();
        // Random nonces make every ciphertext unique.
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let cipher = test_cipher();
        let opaque = cipher.encrypt("secret").unwrap();

        let mut bytes = BASE64.decode(&opaque).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64.encode(bytes);

        assert!(matches!(
            cipher.decrypt(&tampered),
            Err(CipherError::DecryptFailed)
        ));
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let cipher = test_cipher();
        assert!(matches!(
            cipher.decrypt("not valid base64!!!"),
            Err(CipherError::Malformed)
        ));
    }

    #[test]
    fn short_input_is_malformed() {
        let cipher = test_cipher();
        let short = BASE64.encode([0u8; 8]);
        assert!(matches!(
            cipher.decrypt(&short),
            Err(CipherError::Malformed)
        ));
    }

    #[test]
    fn wrong_passphrase_cannot_decrypt() {
        let cipher = test_cipher();
        let opaque = cipher.encrypt("secret").unwrap();

        let other = AesGcmTokenCipher::new(&SecretString::new("other-passphrase".to_string()));
        assert!(matches!(
            other.decrypt(&opaque),
            Err(CipherError::DecryptFailed)
        ));
    }
}
