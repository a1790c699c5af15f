//! Login-history audit records.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One append-only login audit record. Never mutated or individually
/// deleted; bulk removal only happens as a cascade of user deletion.
#[derive(Debug, Clone, Serialize)]
pub struct LoginHistoryEntry {
    pub user_id: i64,
    pub device_info: String,
    pub ip_address: String,
    pub logged_in_at: DateTime<Utc>,
}

impl LoginHistoryEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(user_id: i64, device_info: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            user_id,
            device_info: device_info.into(),
            ip_address: ip_address.into(),
            logged_in_at: Utc::now(),
        }
    }
}
