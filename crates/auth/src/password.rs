//! Password hashing (Argon2id, PHC string format).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(password_hash::Error),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only an unreadable hash is an error.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(PasswordError::MalformedHash)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedHash(e)),
    }
}

/// Like [`verify_password`], but for a lookup that may have found no account.
///
/// With no stored hash the password is still run through Argon2 and the result
/// is `Ok(false)`, so an unknown account costs the same time as a wrong password.
pub fn verify_password_against(plain: &str, stored_hash: Option<&str>) -> Result<bool, PasswordError> {
    match stored_hash {
        Some(hash) => verify_password(plain, hash),
        None => hash_password(plain).map(|_| false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_contains_the_plaintext() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("password123"));
    }

    #[test]
    fn verifies_matching_and_mismatching_passwords() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("wrongPassword", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(
            hash_password("password123").unwrap(),
            hash_password("password123").unwrap()
        );
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("password123", "plaintext"),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn missing_account_never_verifies() {
        assert!(!verify_password_against("password123", None).unwrap());

        let hash = hash_password("password123").unwrap();
        assert!(verify_password_against("password123", Some(&hash)).unwrap());
        assert!(!verify_password_against("wrongPassword", Some(&hash)).unwrap());
    }
}
