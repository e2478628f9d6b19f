//! Password hashing with Argon2id

use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

/// Argon2 work factors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),
    #[error("entropy source failure: {0}")]
    Entropy(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Salted one-way password hasher.
///
/// Cloning is cheap and clones share the same settings, so a copy can be
/// moved onto the blocking thread pool for each call.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash of a fixed string, verified against when there is no real hash
    burn_hash: Arc<str>,
}

impl PasswordHasher {
    const SALT_LEN: usize = 16;

    pub fn new(params: HashParams) -> Result<Self, PasswordError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut hasher = Self {
            argon2,
            burn_hash: Arc::from(""),
        };
        hasher.burn_hash = Arc::from(hasher.hash("tracker-burn-password")?);
        Ok(hasher)
    }

    /// Hash a plaintext password into a PHC string with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; Self::SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| PasswordError::Entropy(e.to_string()))?;
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hash(e.to_string()))?;

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A mismatch is `false`, not an error. So is a stored hash that does not
    /// parse, which is logged since it means the record is corrupt.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
                return false;
            }
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spend one verification worth of work and return `false`.
    ///
    /// Login calls this when the email is unknown so that path costs the
    /// same as a wrong password.
    pub fn burn(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.burn_hash);
        false
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("algorithm", &"argon2id")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap parameters keep the unit tests fast; production uses defaults.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify_success() {
        let hasher = hasher();
        let hash = hasher.hash("s3cret").unwrap();
        assert!(hasher.verify("s3cret", &hash));
    }

    #[test]
    fn test_verify_wrong_password() {
        let hasher = hasher();
        let hash = hasher.hash("s3cret").unwrap();
        assert!(!hasher.verify("s3cret ", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same", &a));
        assert!(hasher.verify("same", &b));
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hasher().hash("s3cret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("s3cret"));
    }

    #[test]
    fn test_verify_invalid_hash_is_false() {
        assert!(!hasher().verify("password", "invalid_hash"));
        assert!(!hasher().verify("password", ""));
    }

    #[test]
    fn test_burn_never_succeeds() {
        let hasher = hasher();
        assert!(!hasher.burn("tracker-burn-password"));
        assert!(!hasher.burn("anything"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordHasher::new(HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        });
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }

    #[test]
    fn test_hashes_from_other_params_still_verify() {
        let strong = PasswordHasher::new(HashParams {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let hash = strong.hash("s3cret").unwrap();
        assert!(hasher().verify("s3cret", &hash));
    }
}
