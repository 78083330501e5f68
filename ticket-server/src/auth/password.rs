//! Password hashing (Argon2id)
//!
//! Plaintext passwords only pass through [`PasswordHasher::hash`] and
//! [`PasswordHasher::verify`]; they are never stored or logged.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use shared::error::AppError;

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    /// Memory in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PasswordCost {
    /// 64 MiB, 3 passes
    pub const PRODUCTION: Self = Self {
        memory_kib: 65_536,
        iterations: 3,
        parallelism: 1,
    };

    /// Cheapest parameters argon2 accepts (tests only)
    pub const MINIMAL: Self = Self {
        memory_kib: Params::MIN_M_COST,
        iterations: 1,
        parallelism: 1,
    };
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self::PRODUCTION
    }
}

/// Argon2id hasher with configured cost
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: PasswordCost,
}

impl PasswordHasher {
    pub fn new(cost: PasswordCost) -> Self {
        Self { cost }
    }

    fn argon2(&self) -> Result<Argon2<'static>, AppError> {
        let params = Params::new(
            self.cost.memory_kib,
            self.cost.iterations,
            self.cost.parallelism,
            None,
        )
        .map_err(|e| AppError::internal(format!("Invalid password hashing parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password into a PHC string
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Verify a password against a stored PHC string
    ///
    /// Parameters are read from the hash itself, so hashes made with a
    /// different cost still verify.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(PasswordCost::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(PasswordCost::MINIMAL);
        let hash = hasher.hash("s3cret!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("s3cret!"));
        assert!(hasher.verify("s3cret!", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hasher = PasswordHasher::new(PasswordCost::MINIMAL);
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let hasher = PasswordHasher::new(PasswordCost::MINIMAL);
        assert!(!hasher.verify("anything", "not-a-hash"));
    }

    #[test]
    fn test_hash_carries_its_cost() {
        let hasher = PasswordHasher::new(PasswordCost::MINIMAL);
        let hash = hasher.hash("pw1234").unwrap();
        assert!(hash.contains(&format!("m={}", Params::MIN_M_COST)));
        // verification with a differently configured hasher still works
        assert!(PasswordHasher::new(PasswordCost::PRODUCTION).verify("pw1234", &hash));
    }
}
