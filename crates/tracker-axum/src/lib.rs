//! Tracker Axum Integration
//!
//! Axum middleware and extractors for bearer-token authentication and role
//! gating.
//!
//! # Quick Start
//!
//! ```ignore
//! use tracker_axum::{AuthLayer, RequireAuth};
//! use axum::{Router, routing::get};
//!
//! async fn protected_handler(auth: RequireAuth) -> String {
//!     format!("Hello, user {}!", auth.user_id)
//! }
//!
//! let app = Router::new()
//!     .route("/api/protected", get(protected_handler))
//!     .route_layer(AuthLayer::new(verifier));
//! ```
//!
//! # Extractors
//!
//! - [`RequireAuth`] - Requires valid authentication (401 if missing)
//! - [`RequireAdmin`] - Requires admin role (403 if not admin)

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

// Re-export primary types
pub use context::AuthContext;
pub use error::AuthRejection;
pub use extractors::{AuthContextExt, RequireAdmin, RequireAuth};
pub use layer::{AuthLayer, AuthMiddleware, AuthMiddlewareFuture};
