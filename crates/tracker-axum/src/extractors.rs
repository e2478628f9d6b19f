//! Axum extractors for authentication and authorization.
//!
//! These extractors read the [`AuthContext`] that [`AuthLayer`](crate::AuthLayer)
//! stored in the request extensions. They never look at headers themselves.
//!
//! # Usage
//!
//! ```ignore
//! use tracker_axum::{RequireAdmin, RequireAuth};
//!
//! // Requires authentication (401 if not authenticated)
//! async fn protected(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.user_id)
//! }
//!
//! // Requires the admin role (403 otherwise)
//! async fn admin_only(auth: RequireAdmin) -> String {
//!     format!("Admin {}", auth.user_id)
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracker_types::Role;

use crate::context::AuthContext;
use crate::error::AuthRejection;

/// Extension key for storing auth context in request extensions.
#[derive(Debug, Clone)]
pub struct AuthContextExt(pub AuthContext);

fn context_from(parts: &Parts) -> Option<AuthContext> {
    parts
        .extensions
        .get::<AuthContextExt>()
        .map(|ext| ext.0.clone())
}

/// Extractor that requires authentication.
///
/// Returns 401 Unauthorized if no valid authentication is present.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context_from(parts)
            .map(Self)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor that requires admin role.
///
/// Returns 401 if unauthenticated and 403 if the user is not an admin. The
/// check runs during extraction, before the handler body.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthContext);

impl Deref for RequireAdmin {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = context_from(parts).ok_or(AuthRejection::Unauthenticated)?;
        auth.require_any(&[Role::Admin])?;
        Ok(Self(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use tracker_types::UserId;

    fn parts_with(ctx: Option<AuthContext>) -> Parts {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        if let Some(ctx) = ctx {
            request.extensions_mut().insert(AuthContextExt(ctx));
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_require_auth_missing() {
        let mut parts = parts_with(None);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.unwrap_err(), AuthRejection::Unauthenticated);
    }

    #[tokio::test]
    async fn test_require_auth_present() {
        let ctx = AuthContext::new(UserId::new(), Role::Tester);
        let mut parts = parts_with(Some(ctx.clone()));
        let auth = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.0, ctx);
    }

    #[tokio::test]
    async fn test_require_admin() {
        let mut parts = parts_with(Some(AuthContext::new(UserId::new(), Role::Tester)));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.unwrap_err(), AuthRejection::Forbidden);

        let mut parts = parts_with(Some(AuthContext::new(UserId::new(), Role::Admin)));
        assert!(RequireAdmin::from_request_parts(&mut parts, &()).await.is_ok());

        let mut parts = parts_with(None);
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.unwrap_err(), AuthRejection::Unauthenticated);
    }
}
