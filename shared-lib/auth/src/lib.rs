//! Authentication and authorization library for the blog backend.
//!
//! Tokens are self-issued, HS256-signed and carry an account id, a role and
//! an expiry. This crate builds and verifies them, hashes passwords, and
//! decides whether a request's `Authorization` header grants access to a
//! route.

mod claims;
mod codec;
mod gate;
mod jwt;
mod password;
mod signer;

pub use claims::{Claims, Role};
pub use codec::{build_unsigned_token, decode_segment, encode_segment, split_token, TokenParts};
pub use gate::{authorize, extract_bearer, AccessPolicy};
pub use jwt::{JwtConfig, JwtManager, TokenHeader, TOKEN_VALIDITY_SECS};
pub use password::{hash_password, verify_password};
pub use signer::Signer;

/// Current time as unix seconds, the clock every token check runs against.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
