//! HMAC-SHA256 signing of token signing inputs.

use std::fmt;

use error::AuthError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies with a process-wide symmetric key.
///
/// The key is fixed at construction; every operation works on a clone of the
/// keyed MAC state, so a `Signer` can be shared freely between tasks.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    /// Create a signer from the raw secret bytes. An empty secret is refused.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, AuthError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthError::MissingSigningKey);
        }

        let mac = HmacSha256::new_from_slice(secret).map_err(|e| {
            tracing::error!("Failed to create HMAC key: {}", e);
            AuthError::MissingSigningKey
        })?;

        Ok(Self { mac })
    }

    /// Compute the signature of `input`.
    pub fn sign(&self, input: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(input);
        mac.finalize().into_bytes().to_vec()
    }

    /// Check `signature` against `input` in constant time.
    pub fn verify(&self, input: &[u8], signature: &[u8]) -> bool {
        let mut mac = self.mac.clone();
        mac.update(input);
        mac.verify_slice(signature).is_ok()
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_refused() {
        assert_eq!(Signer::new("").unwrap_err(), AuthError::MissingSigningKey);
    }

    #[test]
    fn test_rfc4231_case_2() {
        let signer = Signer::new("Jefe").unwrap();
        let signature = signer.sign(b"what do ya want for nothing?");
        let hex: String = signature.iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify() {
        let signer = Signer::new("test-secret-key").unwrap();
        let signature = signer.sign(b"header.claims");

        assert!(signer.verify(b"header.claims", &signature));
        assert!(!signer.verify(b"header.claimz", &signature));
        assert!(!signer.verify(b"header.claims", &signature[..31]));

        let mut flipped = signature.clone();
        flipped[0] ^= 0x01;
        assert!(!signer.verify(b"header.claims", &flipped));
    }

    #[test]
    fn test_different_keys_disagree() {
        let a = Signer::new("secret1").unwrap();
        let b = Signer::new("secret2").unwrap();
        assert!(!b.verify(b"input", &a.sign(b"input")));
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = Signer::new("super-secret").unwrap();
        assert!(!format!("{:?}", signer).contains("super-secret"));
    }
}
