//! Application state

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracker_auth_core::{AuthError, AuthService};
use tracker_db::{DbResult, MemoryUserRepository, Repositories};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};

/// Type alias for the auth service with concrete repository types
pub type AuthServiceImpl = AuthService<MemoryUserRepository>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and token verification
    pub auth: Arc<AuthServiceImpl>,
    /// In-memory repositories
    pub repos: Repositories,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(auth: AuthServiceImpl, repos: Repositories, config: Config) -> Self {
        Self {
            auth: Arc::new(auth),
            repos,
            config: Arc::new(config),
        }
    }

    /// Build the auth service over fresh in-memory repositories
    pub fn from_config(config: Config) -> Result<Self, AuthError> {
        let repos = Repositories::in_memory();
        let auth = AuthService::new(config.auth.clone(), Arc::new(repos.users.clone()))?;
        Ok(Self::new(auth, repos, config))
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> Duration {
        self.config.request_timeout
    }

    /// Run a repository call under the configured store timeout
    pub async fn store<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = DbResult<T>>,
    ) -> ApiResult<T> {
        match tokio::time::timeout(self.config.auth.store_timeout, call).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => {
                tracing::error!(op, "Store call timed out");
                Err(ApiError::Auth(AuthError::StoreTimeout(op)))
            }
        }
    }
}
