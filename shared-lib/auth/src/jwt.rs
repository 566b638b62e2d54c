//! Token issuance and verification.

use std::fmt;

use error::AuthError;
use serde::Serialize;

use crate::claims::{Claims, Role};
use crate::codec::{
    build_unsigned_token, decode_segment, decode_signature, encode_segment, split_token, SEPARATOR,
};
use crate::signer::Signer;

/// Lifetime of an issued token: 24 hours.
pub const TOKEN_VALIDITY_SECS: i64 = 24 * 60 * 60;

/// Fixed token header, `{"alg":"HS256","typ":"JWT"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenHeader {
    pub alg: &'static str,
    pub typ: &'static str,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            alg: "HS256",
            typ: "JWT",
        }
    }
}

/// JWT configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token validity duration in seconds
    pub expires_in_secs: i64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the standard 24 hour validity.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_in_secs: TOKEN_VALIDITY_SECS,
        }
    }

    /// Override the token validity.
    pub fn with_expires_in(mut self, secs: i64) -> Self {
        self.expires_in_secs = secs;
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

/// Issues and verifies tokens with one signing key.
#[derive(Debug, Clone)]
pub struct JwtManager {
    signer: Signer,
    expires_in_secs: i64,
}

impl JwtManager {
    /// Build a manager from configuration. Fails when the secret is empty.
    pub fn new(config: &JwtConfig) -> Result<Self, AuthError> {
        Ok(Self {
            signer: Signer::new(config.secret.as_bytes())?,
            expires_in_secs: config.expires_in_secs,
        })
    }

    /// Issue a token for an account at time `now`.
    pub fn issue(&self, account_id: &str, role: Role, now: i64) -> Result<String, AuthError> {
        let claims = Claims::new(account_id, role, now, self.expires_in_secs);
        tracing::debug!(account_id, %role, exp = claims.exp, "Issuing token");
        self.encode_token(&claims)
    }

    /// Encode and sign arbitrary claims.
    pub fn encode_token(&self, claims: &Claims) -> Result<String, AuthError> {
        let unsigned = build_unsigned_token(&TokenHeader::default(), claims).map_err(|e| {
            tracing::error!("Failed to encode token claims: {}", e);
            AuthError::TokenCreationFailed
        })?;

        let signature = self.signer.sign(unsigned.as_bytes());
        Ok(format!("{}{}{}", unsigned, SEPARATOR, encode_segment(signature)))
    }

    /// Verify a token at time `now` and return its claims.
    ///
    /// Checks run in a fixed order and stop at the first failure: segment
    /// count, signature, claims decoding, expiry. Claims are never decoded
    /// from a token whose signature did not match.
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let parts = split_token(token)?;

        let signature =
            decode_signature(parts.signature).map_err(|_| AuthError::InvalidSignature)?;
        if !self.signer.verify(parts.signing_input.as_bytes(), &signature) {
            return Err(AuthError::InvalidSignature);
        }

        let claims: Claims = decode_segment(parts.claims)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(AuthError::InvalidClaimsEncoding)?;

        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
