//! Argon2id password hashing and comparison.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::Credential;

/// Outcome of comparing a supplied password with a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Mismatch,
}

/// Handles password hashing and comparison using Argon2id.
///
/// The salt is kept beside the hash on the credential; the two must agree.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Generates a fresh random salt.
    pub fn generate_salt(&self) -> String {
        SaltString::generate(&mut OsRng).as_str().to_string()
    }

    /// Hashes `password` with the given salt into a PHC string.
    pub fn hash(&self, password: &str, salt: &str) -> AppResult<String> {
        let salt = SaltString::from_b64(salt)
            .map_err(|e| AppError::internal(format!("Invalid password salt: {e}")))?;

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Compares a supplied password with the stored hash, using the stored salt.
    ///
    /// Pure: the credential is not touched.
    pub fn compare(&self, credential: &Credential, supplied: &str) -> AppResult<Comparison> {
        let parsed = PasswordHash::new(&credential.password_hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match parsed.salt {
            Some(salt) if salt.as_str() == credential.salt => {}
            _ => {
                return Err(AppError::internal(
                    "Stored password hash does not carry the stored salt",
                ));
            }
        }

        match Argon2::default().verify_password(supplied.as_bytes(), &parsed) {
            Ok(()) => Ok(Comparison::Match),
            Err(argon2::password_hash::Error::Password) => Ok(Comparison::Mismatch),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}
