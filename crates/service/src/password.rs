use argon2::{
    password_hash::{PasswordHasher as _, PasswordVerifier as _, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;

use crate::errors::ServiceError;

/// One-way salted password hashing.
///
/// Every `hash` call draws a fresh OS-random salt; the work factor is the
/// argon2 crate's default (well above the brute-force floor). Hashing happens
/// exactly once per plaintext, right before persistence; stored digests are
/// never re-hashed.
#[derive(Clone, Default)]
pub struct Hasher;

impl Hasher {
    /// Hash a plaintext. Failure here is fatal to the enclosing save and is
    /// surfaced as an internal error, never a validation error.
    pub fn hash(&self, plaintext: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;
        Ok(digest.to_string())
    }

    /// Verify a plaintext against a stored digest. Comparison runs inside the
    /// argon2 crate and is safe against timing probes. An unparseable digest
    /// simply fails verification.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_original_plaintext() {
        let hasher = Hasher;
        let digest = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &digest));
    }

    #[test]
    fn verify_rejects_other_plaintexts() {
        let hasher = Hasher;
        let digest = hasher.hash("correct horse").unwrap();
        assert!(!hasher.verify("battery staple", &digest));
        assert!(!hasher.verify("", &digest));
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        let hasher = Hasher;
        let a = hasher.hash("same input").unwrap();
        let b = hasher.hash("same input").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same input", &a));
        assert!(hasher.verify("same input", &b));
    }

    #[test]
    fn garbage_digest_fails_closed() {
        let hasher = Hasher;
        assert!(!hasher.verify("anything", "not-a-phc-string"));
    }
}
