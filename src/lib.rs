//! Qrisgate - Federated-login session engine with QRIS payment reconciliation
//!
//! This crate implements the token/session lifecycle (identity verification,
//! user provisioning, access/refresh issuance with rotation, revocation) and
//! the payment-notification reconciliation step behind a signature gate.
//! HTTP routing is owned by the embedding server, which wires the adapters
//! into the application services at its composition root.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
