//! Repository traits
//!
//! Async interfaces the auth core and API handlers depend on. Consistency
//! (email uniqueness, atomic create) is the implementation's responsibility.

use async_trait::async_trait;
use tracker_types::{Project, UserId};

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>>;

    /// Find a user by email (exact, case-sensitive)
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user, assigning its ID.
    ///
    /// Returns [`DbError::Conflict`](crate::DbError::Conflict) if the email
    /// is already registered.
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// List all users, oldest first
    async fn list(&self) -> DbResult<Vec<UserRow>>;
}

/// Project repository trait
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project, assigning its ID
    async fn create(&self, project: CreateProject) -> DbResult<Project>;

    /// List all projects, oldest first
    async fn list(&self) -> DbResult<Vec<Project>>;
}
