//! Tracker API
//!
//! REST service for registration, login and role-gated project management.
//!
//! ## REST Endpoints
//!
//! - `POST /api/auth/register` - Create an account, returns user and token
//! - `POST /api/auth/login` - Exchange credentials for a token
//! - `GET /api/auth/me` - Identity behind the presented token
//! - `GET /api/auth/users` - List users
//! - `POST /api/projects` - Create a project (admin only)
//! - `GET /api/projects` - List projects with members resolved
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracker_axum::AuthLayer;

pub use crate::config::{Config, ConfigError};
pub use crate::error::{ApiError, ApiResult};
pub use crate::state::AppState;

/// Build the full HTTP router
pub fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // Open auth routes
    let public = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login));

    // Bearer token required; role checks happen in the extractors
    let protected = Router::new()
        .route("/auth/me", get(handlers::me))
        .route("/auth/users", get(handlers::list_users))
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route_layer(AuthLayer::new(state.auth.verifier().clone()));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    // Combine all routes
    Router::new()
        .nest("/api", public.merge(protected))
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

/// Install the Prometheus recorder and describe the service's metrics
pub fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!(
        "auth_register_total",
        "Registration attempts by outcome"
    );
    metrics::describe_counter!("auth_login_total", "Login attempts by outcome");
    metrics::describe_counter!(
        "auth_token_rejections_total",
        "Rejected bearer tokens by reason"
    );
    metrics::describe_counter!(
        "auth_forbidden_total",
        "Authenticated requests denied by role"
    );

    Ok(handle)
}
