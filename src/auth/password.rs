use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use once_cell::sync::Lazy;
use rand_core::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Hash compared against when a login names an unknown account, so both
/// failure paths cost one Argon2 verification.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    hash_password("mygram-dummy-password").unwrap_or_default()
});

/// Argon2id hash with a fresh random salt, in PHC string format
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// A digest that cannot be parsed never matches.
pub fn verify_password(digest: &str, plaintext: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Burn one verification against a throwaway hash
pub fn verify_dummy(plaintext: &str) {
    let _ = verify_password(&DUMMY_HASH, plaintext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let digest = hash_password("secret1").unwrap();
        assert_ne!(digest, "secret1");
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password(&digest, "secret1"));
        assert!(!verify_password(&digest, "secret2"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_digest_never_matches() {
        assert!(!verify_password("plaintext-not-a-hash", "plaintext-not-a-hash"));
    }
}
