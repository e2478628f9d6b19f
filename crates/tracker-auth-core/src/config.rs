//! Configuration types for the auth service

use std::time::Duration;

use crate::crypto::{HmacKey, HmacKeyError};
use crate::password::HashParams;

/// Auth service configuration
///
/// Built once at startup and handed to the issuer, verifier and service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Process-wide token signing key
    pub signing_key: HmacKey,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Upper bound on any single credential-store call
    pub store_timeout: Duration,
    /// Argon2 work factors for new password hashes
    pub hash_params: HashParams,
}

impl AuthConfig {
    /// Default token lifetime
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Default store call timeout
    pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

    /// Create a config from the signing secret, with default TTL and timeouts.
    ///
    /// # Errors
    /// Returns error if the secret is shorter than 32 bytes.
    pub fn try_new(secret: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        Ok(Self {
            signing_key: HmacKey::new(secret)?,
            token_ttl: Self::DEFAULT_TOKEN_TTL,
            store_timeout: Self::DEFAULT_STORE_TIMEOUT,
            hash_params: HashParams::default(),
        })
    }

    /// Set token lifetime
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set store call timeout
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Set Argon2 work factors
    pub fn with_hash_params(mut self, params: HashParams) -> Self {
        self.hash_params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::try_new("s".repeat(32)).unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.store_timeout, Duration::from_secs(2));
        assert_eq!(config.hash_params, HashParams::default());
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(AuthConfig::try_new("too-short").is_err());
    }

    #[test]
    fn test_builders() {
        let config = AuthConfig::try_new("s".repeat(32))
            .unwrap()
            .with_token_ttl(Duration::from_secs(60))
            .with_store_timeout(Duration::from_millis(250));
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert_eq!(config.store_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let config = AuthConfig::try_new("very-secret-signing-key-material!!").unwrap();
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
