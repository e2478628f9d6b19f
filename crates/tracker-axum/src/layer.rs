//! Tower middleware layer for bearer-token authentication.
//!
//! The [`AuthLayer`] verifies `Authorization: Bearer <token>` on every
//! request it wraps and stores the resulting [`AuthContext`] in the request
//! extensions. Verification is local (HMAC check plus expiry), so the layer
//! never waits on the credential store.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderValue, Request};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracker_auth_core::{record_rejection, TokenError, TokenVerifier};

use crate::context::AuthContext;
use crate::error::AuthRejection;
use crate::extractors::AuthContextExt;

/// Tower layer that authenticates requests with a [`TokenVerifier`].
///
/// Requests without a valid token are answered with 401 before the inner
/// service runs.
#[derive(Clone)]
pub struct AuthLayer {
    verifier: TokenVerifier,
}

impl AuthLayer {
    #[must_use]
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            verifier: self.verifier.clone(),
        }
    }
}

/// The authentication middleware produced by [`AuthLayer`].
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    verifier: TokenVerifier,
}

impl<S> AuthMiddleware<S> {
    /// Resolve the caller from the request's `Authorization` header.
    fn authenticate(&self, req: &Request<Body>) -> Option<AuthContext> {
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(HeaderValue::to_str)
            .transpose();

        let claims = match authorization {
            Ok(authorization) => self.verifier.authenticate(authorization, Utc::now()),
            Err(_) => Err(record_rejection(TokenError::Malformed)),
        };

        claims.ok().map(|claims| AuthContext::from(&claims))
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = AuthMiddlewareFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let Some(ctx) = self.authenticate(&req) else {
            return AuthMiddlewareFuture {
                state: FutureState::Rejected {
                    response: Some(AuthRejection::Unauthenticated.into_response()),
                },
            };
        };

        tracing::debug!(user_id = %ctx.user_id, role = %ctx.role, "Request authenticated");
        req.extensions_mut().insert(AuthContextExt(ctx));

        // The clone is the one that was just polled ready
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        AuthMiddlewareFuture {
            state: FutureState::Calling {
                future: inner.call(req),
            },
        }
    }
}

pin_project! {
    /// Future for the auth middleware.
    pub struct AuthMiddlewareFuture<F> {
        #[pin]
        state: FutureState<F>,
    }
}

pin_project! {
    #[project = FutureStateProj]
    enum FutureState<F> {
        Rejected {
            response: Option<Response>,
        },
        Calling {
            #[pin]
            future: F,
        },
    }
}

impl<F, E> Future for AuthMiddlewareFuture<F>
where
    F: Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().state.project() {
            FutureStateProj::Rejected { response } => match response.take() {
                Some(response) => Poll::Ready(Ok(response)),
                None => panic!("AuthMiddlewareFuture polled after completion"),
            },
            FutureStateProj::Calling { future } => future.poll(cx),
        }
    }
}
