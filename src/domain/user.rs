//! User and verified-identity types.

use serde::{Deserialize, Serialize};

/// Role of a principal.
///
/// A single session engine serves both kinds; authorization decisions in the
/// HTTP layer branch on this tag rather than on separate per-role services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Stable string form used in token claims and database rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parses the stable string form. Unknown values are rejected.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// One registered principal.
///
/// `google_uid` is the external-provider subject id: immutable, unique, and
/// the only correlation key between verified assertions and local users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal numeric identity assigned by the store.
    pub id: i64,

    /// External-provider subject id. Never changes after creation.
    pub google_uid: String,

    /// Display name.
    pub name: String,

    /// Email address from the identity provider.
    pub email: String,

    /// Avatar URL, if the provider supplied one.
    pub picture: Option<String>,

    /// Principal kind.
    pub role: Role,

    /// Whether the user currently holds a live session.
    pub logged_in: bool,
}

/// Claims extracted from a successfully verified identity assertion.
///
/// Produced by the `IdentityVerifier` port; the engine never sees the raw
/// assertion again after verification.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Provider subject id.
    pub subject: String,

    /// Email claim.
    pub email: String,

    /// Name claim, when present.
    pub name: Option<String>,

    /// Picture claim, when present.
    pub picture: Option<String>,
}

impl VerifiedIdentity {
    /// Returns the claim-provided name, or the email as fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
