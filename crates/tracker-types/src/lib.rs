//! Tracker Types - Shared domain types
//!
//! This crate contains domain types used across the tracker crates:
//! - User identity and roles
//! - Auth request/response payloads
//! - Projects and their user assignments
//! - Field-level validation errors

pub mod auth;
pub mod error;
pub mod project;
pub mod user;

pub use auth::*;
pub use error::*;
pub use project::*;
pub use user::*;
