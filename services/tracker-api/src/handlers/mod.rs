//! HTTP handlers

mod auth;
mod health;
mod projects;

pub use auth::{list_users, login, me, register};
pub use health::{health, ready};
pub use projects::{create_project, list_projects};
