//! Auth service - ties together the credential store, password hasher and
//! token issuer into the registration and login flows

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tracker_db::{CreateUser, DbResult, UserRepository};
use tracker_types::{
    AuthResponse, LoginRequest, PublicUser, RegisterRequest, Role, UserId, ValidationErrors,
};

use crate::{
    config::AuthConfig,
    password::PasswordHasher,
    token::{Identity, IssuedToken, TokenIssuer, TokenVerifier},
    AuthError,
};

/// Authentication service
///
/// Provides unified interface for:
/// - Registration (validation, hashing, uniqueness)
/// - Login (credential check, token issuance)
/// - Token verification for protected calls
/// - User lookups
pub struct AuthService<U: UserRepository> {
    config: AuthConfig,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    users: Arc<U>,
}

impl<U: UserRepository> AuthService<U> {
    /// Create a new auth service
    ///
    /// # Errors
    /// Returns [`AuthError::Hashing`] if the configured Argon2 parameters are
    /// out of range.
    pub fn new(config: AuthConfig, users: Arc<U>) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.hash_params)?;

        Ok(Self {
            issuer: TokenIssuer::from_config(&config),
            verifier: TokenVerifier::from_config(&config),
            hasher,
            users,
            config,
        })
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new user.
    ///
    /// Every failing field is reported at once. The role defaults to
    /// `tester` when absent or blank.
    pub async fn register(&self, request: RegisterRequest) -> Result<PublicUser, AuthError> {
        let result = self.try_register(request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(AuthError::Validation(_)) => "validation",
            Err(AuthError::Conflict) => "conflict",
            Err(_) => "error",
        };
        metrics::counter!("auth_register_total", "outcome" => outcome).increment(1);

        result
    }

    async fn try_register(&self, request: RegisterRequest) -> Result<PublicUser, AuthError> {
        let (name, email, role) = validate_registration(&request)?;

        // Cheap early answer; `create` still enforces uniqueness atomically
        if self
            .store("find_by_email", self.users.find_by_email(&email))
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict);
        }

        let hasher = self.hasher.clone();
        let password = request.password;
        let password_hash = blocking(move || hasher.hash(&password)).await??;

        let user = self
            .store(
                "create_user",
                self.users.create(CreateUser {
                    name,
                    email,
                    password_hash,
                    role,
                }),
            )
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user.into())
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Check credentials and issue a token.
    ///
    /// An unknown email and a wrong password produce the same error and
    /// cost the same hashing work.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let result = self.try_login(request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(AuthError::Validation(_)) => "validation",
            Err(AuthError::InvalidCredentials) => "invalid_credentials",
            Err(_) => "error",
        };
        metrics::counter!("auth_login_total", "outcome" => outcome).increment(1);

        result
    }

    async fn try_login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = request.email.trim();
        let mut errors = ValidationErrors::new();
        errors.require("email", email);
        if request.password.is_empty() {
            errors.add("password", "password is required");
        }
        errors.into_result().map_err(AuthError::Validation)?;

        let user = self
            .store("find_by_email", self.users.find_by_email(email))
            .await?;

        let hasher = self.hasher.clone();
        let password = request.password;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.burn(&password),
        })
        .await?;

        let user = match user {
            Some(user) if verified => user.to_public(),
            _ => {
                tracing::debug!("Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let issued = self.issue_for(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            user,
            token: issued.token,
        })
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Issue a token for an already-loaded user, valid from now
    pub fn issue_for(&self, user: &PublicUser) -> Result<IssuedToken, AuthError> {
        self.issuer.issue(user.id, user.role, Utc::now())
    }

    /// Resolve the identity behind an `Authorization` header value
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        self.verifier
            .authenticate(authorization, Utc::now())
            .map(|claims| claims.identity())
    }

    /// Verifier sharing this service's key, for the HTTP auth layer
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    // =========================================================================
    // User Lookups
    // =========================================================================

    /// All registered users, oldest first
    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AuthError> {
        let users = self.store("list_users", self.users.list()).await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// One user by id
    pub async fn find_user(&self, id: UserId) -> Result<Option<PublicUser>, AuthError> {
        let user = self.store("find_by_id", self.users.find_by_id(id)).await?;
        Ok(user.map(PublicUser::from))
    }

    /// Bound a store call by the configured timeout
    async fn store<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = DbResult<T>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => {
                tracing::error!(
                    op,
                    timeout_ms = self.config.store_timeout.as_millis() as u64,
                    "Credential store call timed out"
                );
                Err(AuthError::StoreTimeout(op))
            }
        }
    }
}

/// Run CPU-heavy hashing work off the async executor
async fn blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!("Hashing task failed: {}", e);
        AuthError::Hashing(e.to_string())
    })
}

/// Trim and check registration fields, collecting every failure
fn validate_registration(request: &RegisterRequest) -> Result<(String, String, Role), AuthError> {
    let name = request.name.trim();
    let email = request.email.trim();

    let mut errors = ValidationErrors::new();
    errors.require("name", name);
    errors.require("email", email);
    if request.password.is_empty() {
        errors.add("password", "password is required");
    }

    let role = match request.role.as_deref() {
        None | Some("") => Role::default(),
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                errors.add("role", e.to_string());
                Role::default()
            }
        },
    };

    errors.into_result().map_err(AuthError::Validation)?;
    Ok((name.to_string(), email.to_string(), role))
}

impl<U: UserRepository> std::fmt::Debug for AuthService<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish()
    }
}
