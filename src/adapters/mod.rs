//! Concrete implementations of the ports.

pub mod auth;
pub mod cipher;
pub mod midtrans;
pub mod postgres;
