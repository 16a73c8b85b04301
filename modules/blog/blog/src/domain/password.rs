//! Password hashing.
//!
//! Plain-text passwords never reach storage: the service hashes them here
//! and the repositories only ever see PHC strings.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;

use crate::domain::error::DomainError;

pub trait PasswordHasher: Send + Sync {
    /// Hash a plain-text password into a self-describing PHC string.
    ///
    /// # Errors
    /// Returns `DomainError::Password` if the hasher rejects the input.
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a valid PHC string.
    ///
    /// # Errors
    /// Returns `DomainError::Password` for an unparsable hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}

/// Argon2id with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let mut salt_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| DomainError::password(e.to_string()))?;

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::password(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash).map_err(|e| DomainError::password(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_only_the_original_password() {
        let hasher = Argon2Hasher;
        let hash = hasher
            .hash("correct horse battery staple")
            .unwrap_or_else(|e| panic!("hashing failed: {e}"));

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct horse"));
        assert!(matches!(
            hasher.verify("correct horse battery staple", &hash),
            Ok(true)
        ));
        assert!(matches!(hasher.verify("Tr0ub4dor&3", &hash), Ok(false)));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let hasher = Argon2Hasher;
        let a = hasher.hash("same").unwrap_or_default();
        let b = hasher.hash("same").unwrap_or_default();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(matches!(
            Argon2Hasher.verify("pw", "not-a-phc-string"),
            Err(DomainError::Password { .. })
        ));
    }
}
