//! Token claims and role definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account roles in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator, may publish and delete posts
    Admin,
    /// Regular author
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Claims carried inside a token.
///
/// Only ever trusted once the token's signature has been checked; see
/// [`crate::JwtManager::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account the token was issued to
    pub account_id: String,
    /// Account role at issue time
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an account, valid for `expires_in_secs` from `issued_at`.
    pub fn new(
        account_id: impl Into<String>,
        role: Role,
        issued_at: i64,
        expires_in_secs: i64,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            role,
            exp: issued_at + expires_in_secs,
        }
    }

    /// Check if the claims have expired at `now`. `exp` itself is already past.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Check whether the role is one of `allowed`.
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}
