//! Argon2id password hashing and verification.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use sentinel_core::error::AppError;

/// Input hashed once to produce the decoy used for unknown accounts.
const DECOY_INPUT: &str = "sentinel-decoy-password";

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Hash verified against when no account exists, so both paths cost the
    /// same. Computed up front so the first unknown-account lookup does not
    /// pay for hashing it.
    decoy: Option<Arc<str>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    /// Creates a new password hasher instance and computes its decoy hash.
    pub fn new() -> Self {
        let mut hasher = Self { decoy: None };
        hasher.decoy = hasher.hash_password(DECOY_INPUT).ok().map(Arc::from);
        hasher
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        let argon2 = Argon2::default();
        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Runs a verification that always fails, for lookups that found no account.
    pub fn verify_decoy(&self, password: &str) {
        match &self.decoy {
            Some(decoy) => {
                let _ = self.verify_password(password, decoy);
            }
            // Hashing costs about as much as verifying.
            None => {
                let _ = self.hash_password(password);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("Str0ng@Pass").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("Str0ng@Pass", &hash).unwrap());
        assert!(!hasher.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_decoy_is_ready_before_first_lookup() {
        let hasher = PasswordHasher::new();
        let decoy = hasher.decoy.as_deref().unwrap();

        assert!(decoy.starts_with("$argon2id$"));
        assert!(!hasher.verify_password("Str0ng@Pass", decoy).unwrap());
        hasher.verify_decoy("Str0ng@Pass");
        assert_eq!(hasher.clone().decoy.as_deref(), Some(decoy));
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        let hasher = PasswordHasher::new();
        let err = hasher.verify_password("x", "not-a-hash").unwrap_err();
        assert_eq!(err.kind, sentinel_core::ErrorKind::Internal);
    }
}
