//! Authentication context types.
//!
//! The [`AuthContext`] struct carries the identity the auth layer resolved
//! from the bearer token. It lives in the request's extensions, so it is
//! scoped to exactly one request.

use chrono::{DateTime, Utc};
use tracker_auth_core::{Identity, TokenClaims};
use tracker_types::{Role, UserId};

use crate::error::AuthRejection;

/// Authenticated caller of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The role fixed into the token at issuance.
    pub role: Role,
    /// When the presented token stops being accepted.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthContext {
    /// Create a new auth context with no known expiry.
    #[must_use]
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            expires_at: None,
        }
    }

    /// Set the token expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// The `{user_id, role}` pair used for authorization.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            role: self.role,
        }
    }

    /// Fail with 403 unless the caller's role is one of `allowed`.
    pub fn require_any(&self, allowed: &[Role]) -> Result<(), AuthRejection> {
        self.identity()
            .require_any(allowed)
            .map_err(|_| AuthRejection::Forbidden)
    }

    /// Check if the user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&TokenClaims> for AuthContext {
    fn from(claims: &TokenClaims) -> Self {
        let ctx = Self::new(claims.user_id, claims.role);
        match claims.expires_at_utc() {
            Some(expires_at) => ctx.with_expiry(expires_at),
            None => ctx,
        }
    }
}
