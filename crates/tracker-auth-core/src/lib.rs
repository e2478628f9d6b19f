//! Tracker Auth Core - Authentication business logic
//!
//! Password hashing, signed session tokens, role gating, and the
//! registration and login flows built on them.

pub mod config;
pub mod crypto;
pub mod error;
pub mod gate;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use crypto::{HmacKey, HmacKeyError};
pub use error::*;
pub use gate::{require_role, Decision};
pub use password::{HashParams, PasswordError, PasswordHasher};
pub use service::*;
pub use token::{
    extract_bearer, record_rejection, Identity, IssuedToken, TokenClaims, TokenError, TokenIssuer,
    TokenVerifier,
};
