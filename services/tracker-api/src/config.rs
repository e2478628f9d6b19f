//! Configuration for the Tracker API service.

use std::time::Duration;
use tracker_auth_core::{AuthConfig, HashParams};

/// Tracker API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Upper bound on a whole request, excluding health and metrics routes
    pub request_timeout: Duration,

    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server port
        let http_port = parse_or(&lookup, "HTTP_PORT", 5000)?;

        // Token secret (minimum 32 bytes)
        let token_secret = lookup("TOKEN_SECRET").ok_or(ConfigError::Missing("TOKEN_SECRET"))?;

        if token_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "TOKEN_SECRET must be at least 32 characters",
            ));
        }

        // Token lifetime (default 24 hours)
        let token_ttl_hours: u64 = parse_or(&lookup, "TOKEN_TTL_HOURS", 24)?;
        if token_ttl_hours == 0 {
            return Err(ConfigError::Invalid("TOKEN_TTL_HOURS must be positive"));
        }
        let token_ttl_secs = token_ttl_hours
            .checked_mul(3600)
            .ok_or(ConfigError::Invalid("TOKEN_TTL_HOURS"))?;

        // Store call timeout (default 2 seconds)
        let store_timeout_ms: u64 = parse_or(&lookup, "STORE_TIMEOUT_MS", 2000)?;

        // Request timeout (default 30 seconds)
        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        // Metrics
        let metrics_enabled = lookup("METRICS_ENABLED")
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        // Argon2 work factors, each falling back to the library default
        let defaults = HashParams::default();
        let hash_params = HashParams {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        // Build auth config
        let auth = AuthConfig::try_new(&token_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_token_ttl(Duration::from_secs(token_ttl_secs))
            .with_store_timeout(Duration::from_millis(store_timeout_ms))
            .with_hash_params(hash_params);

        Ok(Self {
            http_port,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("TOKEN_SECRET", SECRET)]).unwrap();
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.auth.token_ttl, Duration::from_secs(24 * 3600));
        assert_eq!(config.auth.store_timeout, Duration::from_millis(2000));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.metrics_enabled);
        assert_eq!(config.auth.hash_params, HashParams::default());
    }

    #[test]
    fn test_missing_secret() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("TOKEN_SECRET"))));
    }

    #[test]
    fn test_short_secret() {
        assert!(matches!(
            load(&[("TOKEN_SECRET", "short")]),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TOKEN_SECRET", SECRET),
            ("HTTP_PORT", "8080"),
            ("TOKEN_TTL_HOURS", "1"),
            ("STORE_TIMEOUT_MS", "150"),
            ("METRICS_ENABLED", "false"),
            ("ARGON2_ITERATIONS", "3"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.auth.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.auth.store_timeout, Duration::from_millis(150));
        assert!(!config.metrics_enabled);
        assert_eq!(config.auth.hash_params.iterations, 3);
        assert_eq!(
            config.auth.hash_params.memory_kib,
            HashParams::default().memory_kib
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            load(&[("TOKEN_SECRET", SECRET), ("HTTP_PORT", "eighty")]),
            Err(ConfigError::Invalid("HTTP_PORT"))
        ));
        assert!(matches!(
            load(&[("TOKEN_SECRET", SECRET), ("TOKEN_TTL_HOURS", "0")]),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            load(&[("TOKEN_SECRET", SECRET), ("TOKEN_TTL_HOURS", "18446744073709551615")]),
            Err(ConfigError::Invalid("TOKEN_TTL_HOURS"))
        ));
    }
}
