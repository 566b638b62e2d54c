//! Three-segment token encoding.
//!
//! A token is `base64url(header) "." base64url(claims) "." base64url(signature)`
//! with padding stripped.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use error::AuthError;
use serde::Serialize;

/// Separator between token segments.
pub const SEPARATOR: char = '.';

/// Encodes without padding, decodes whether or not padding was kept.
const SEGMENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as an unpadded URL-safe base64 segment.
pub fn encode_segment(bytes: impl AsRef<[u8]>) -> String {
    SEGMENT.encode(bytes)
}

/// Decode a URL-safe base64 segment, with or without padding.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, AuthError> {
    SEGMENT
        .decode(segment)
        .map_err(|_| AuthError::MalformedEncoding)
}

/// Decode a signature segment. Only the canonical unpadded form is accepted,
/// so two different strings never verify as the same signature.
pub(crate) fn decode_signature(segment: &str) -> Result<Vec<u8>, AuthError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::MalformedEncoding)
}

/// Serialize and encode header and claims, joined as `header "." claims`.
///
/// The result is the signing input; the signature segment is appended by
/// the caller.
pub fn build_unsigned_token<H, C>(header: &H, claims: &C) -> Result<String, serde_json::Error>
where
    H: Serialize,
    C: Serialize,
{
    let header = serde_json::to_vec(header)?;
    let claims = serde_json::to_vec(claims)?;
    Ok(format!(
        "{}{}{}",
        encode_segment(header),
        SEPARATOR,
        encode_segment(claims)
    ))
}

/// The three segments of a token, borrowed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub header: &'a str,
    pub claims: &'a str,
    pub signature: &'a str,
    /// `header "." claims`, exactly as it appears in the token
    pub signing_input: &'a str,
}

/// Split a token into its three segments.
pub fn split_token(token: &str) -> Result<TokenParts<'_>, AuthError> {
    let mut segments = token.split(SEPARATOR);
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(claims), Some(signature), None)
            if !header.is_empty() && !claims.is_empty() && !signature.is_empty() =>
        {
            Ok(TokenParts {
                header,
                claims,
                signature,
                signing_input: &token[..header.len() + 1 + claims.len()],
            })
        }
        _ => Err(AuthError::InvalidFormat),
    }
}
