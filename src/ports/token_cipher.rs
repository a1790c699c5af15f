//! Symmetric cipher port for refresh-token material at rest.

use thiserror::Error;

/// Errors from the symmetric cipher.
#[derive(Debug, Clone, Error)]
pub enum CipherError {
    /// The opaque input is not valid armored ciphertext.
    #[error("malformed ciphertext")]
    Malformed,

    /// Decryption or authentication of the ciphertext failed.
    #[error("decryption failed")]
    DecryptFailed,

    /// Encryption failed (key setup or AEAD failure).
    #[error("encryption failed: {0}")]
    EncryptFailed(String),
}

/// Encrypts and decrypts opaque refresh-token material.
///
/// # Contract
///
/// - `decrypt(encrypt(x)) == x` for every plaintext the engine produces
/// - `decrypt` fails with `CipherError` on any malformed or tampered input,
///   never panics
/// - Output of `encrypt` is printable (armored) and safe to store in a text
///   column and return to clients
pub trait TokenCipher: Send + Sync {
    /// Encrypt a plaintext into an opaque armored string.
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError>;

    /// Decrypt an opaque armored string back to the plaintext.
    fn decrypt(&self, opaque: &str) -> Result<String, CipherError>;
}
