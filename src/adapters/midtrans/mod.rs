//! Midtrans Core API adapter for the payment provider port.

mod client;
mod mock;
mod types;

pub use client::MidtransClient;
pub use mock::MockPaymentProvider;
