//! Password hashing service using Argon2id

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash as Argon2Hash, PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::domain::auth::{errors::AuthError, value_objects::PasswordHash};

/// Argon2id password hashing with OWASP-recommended parameters.
///
/// Hashing and verification run on the blocking thread pool so the
/// CPU-bound work does not starve the async runtime.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// OWASP minimum recommended memory cost: 19 MiB
    const MEMORY_COST: u32 = 19_456;
    const TIME_COST: u32 = 2;
    const PARALLELISM: u32 = 1;

    pub fn new() -> Self {
        let params = Params::new(Self::MEMORY_COST, Self::TIME_COST, Self::PARALLELISM, None)
            .expect("Invalid Argon2 parameters");
        Self { params }
    }

    /// Hash a password, producing a PHC-format string
    pub async fn hash(&self, password: String) -> Result<PasswordHash, AuthError> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
        })
        .await
        .map_err(|e| {
            tracing::error!("Password hash task panicked: {}", e);
            AuthError::InvalidPassword {
                reason: "Password hashing failed".to_string(),
            }
        })?
        .map(PasswordHash::from)
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AuthError::InvalidPassword {
                reason: "Password hashing failed".to_string(),
            }
        })
    }

    /// Verify a password against a stored hash
    pub async fn verify(&self, password: String, hash: PasswordHash) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || {
            let parsed_hash = Argon2Hash::new(hash.as_str()).map_err(|e| {
                tracing::error!("Failed to parse password hash: {}", e);
                AuthError::InvalidPassword {
                    reason: "Password verification failed".to_string(),
                }
            })?;

            // Parameters are carried in the PHC string itself
            let argon2 = Argon2::default();
            Ok(argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
        .map_err(|e| {
            tracing::error!("Password verify task panicked: {}", e);
            AuthError::InvalidPassword {
                reason: "Password verification failed".to_string(),
            }
        })?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_password_hashing_and_verification() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("correct horse battery".to_string()).await.unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(
            hasher
                .verify("correct horse battery".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(
            !hasher
                .verify("wrong password".to_string(), hash)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash("same password".to_string()).await.unwrap();
        let second = hasher.hash("same password".to_string()).await.unwrap();
        assert_ne!(first.as_str(), second.as_str());
    }
}
