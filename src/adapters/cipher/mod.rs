//! Symmetric cipher adapters.

mod aes;

pub use aes::AesGcmTokenCipher;
