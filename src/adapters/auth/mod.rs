//! Identity verifier adapters.

mod google;
mod mock;

pub use google::{GoogleConfig, GoogleIdentityVerifier};
pub use mock::MockIdentityVerifier;
