//! Password digests.
//!
//! Passwords are stored as a single unsalted SHA-256 digest, standard base64
//! encoded. This keeps existing stored hashes valid; a salted, memory-hard
//! scheme would need a format tag on the stored value to migrate.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Digest a plaintext password for storage.
pub fn hash_password(password: &str) -> String {
    STANDARD.encode(Sha256::digest(password.as_bytes()))
}

/// Check a plaintext password against a stored digest.
pub fn verify_password(password: &str, stored: &str) -> bool {
    hash_password(password) == stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_base64_sha256() {
        assert_eq!(
            hash_password("secret"),
            "K7gNU3sdo+OL0wNhqoVWhr3g6s1xYv72ol/pe/Unols="
        );
    }

    #[test]
    fn test_verify_password() {
        let stored = hash_password("secret");
        assert!(verify_password("secret", &stored));
        assert!(!verify_password("wrong", &stored));
        assert!(!verify_password("", &stored));
    }
}
