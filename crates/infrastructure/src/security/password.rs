//! Argon2 Password Hashing
//!
//! Hash en formato PHC con sal aleatoria por contraseña; verify acepta
//! cualquier hash PHC válido, así que los parámetros pueden endurecerse sin
//! invalidar hashes antiguos.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use denda_domain::iam::PasswordHasher;
use denda_domain::shared_kernel::{DomainError, Result};

/// Hasher de contraseñas basado en Argon2id
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to hash password: {}", e),
            })?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| DomainError::InfrastructureError {
            message: format!("Stored password hash is invalid: {}", e),
        })?;
        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("txakoli-gorria-2024").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("txakoli-gorria-2024", &hash).unwrap());
        assert!(!hasher.verify("otra-cosa", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_hashes() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("secret123").unwrap();
        let second = hasher.hash("secret123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = Argon2PasswordHasher::new();
        let result = hasher.verify("secret123", "not-a-phc-hash");
        assert!(result.is_err());
    }
}
