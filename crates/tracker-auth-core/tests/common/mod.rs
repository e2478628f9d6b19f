//! Common test utilities for tracker-auth-core integration tests

pub mod mock_repos;

use std::time::Duration;
use tracker_auth_core::{AuthConfig, HashParams};

#[allow(unused_imports)]
pub use mock_repos::{FailingUserRepository, SlowUserRepository};

pub const TEST_SECRET: &str = "integration-test-signing-secret-0123456789";

/// Config with cheap hashing so integration tests stay fast
#[allow(dead_code)]
pub fn test_config() -> AuthConfig {
    AuthConfig::try_new(TEST_SECRET)
        .unwrap()
        .with_hash_params(cheap_hash_params())
        .with_store_timeout(Duration::from_millis(200))
}

#[allow(dead_code)]
pub fn cheap_hash_params() -> HashParams {
    HashParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}
