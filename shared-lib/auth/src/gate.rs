//! Request authorization decisions.
//!
//! Framework-free: takes the raw `Authorization` header value and returns
//! either trusted claims or the reason the request is refused. The HTTP layer
//! turns the reason into a status and message.

use error::AuthError;

use crate::claims::{Claims, Role};
use crate::jwt::JwtManager;

/// Scheme expected in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Who may call a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No token required.
    Public,
    /// A valid token whose role is one of these.
    Roles(Vec<Role>),
}

impl AccessPolicy {
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::Roles(roles.into_iter().collect())
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The value must be exactly `Bearer <token>`: two parts separated by a single
/// space, the first literally `Bearer`. An empty header counts as missing.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingCredentials),
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedAuthorization),
    }
}

/// Decide whether a request may proceed to a route restricted to `allowed`.
pub fn authorize(
    jwt: &JwtManager,
    header: Option<&str>,
    allowed: &[Role],
    now: i64,
) -> Result<Claims, AuthError> {
    let token = extract_bearer(header).map_err(|e| {
        tracing::debug!(reason = %e, "Rejecting request without usable credentials");
        e
    })?;

    let claims = jwt.verify(token, now).map_err(|e| {
        tracing::debug!(reason = %e, "Token verification failed");
        e
    })?;

    if !claims.has_any_role(allowed) {
        tracing::debug!(
            account_id = %claims.account_id,
            role = %claims.role,
            "Role not permitted for route"
        );
        return Err(AuthError::Forbidden);
    }

    Ok(claims)
}
