//! Tracker DB - Storage abstractions
//!
//! Repository traits for users and projects, plus a `DashMap`-backed
//! in-memory implementation used by the API service and tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use tracker_db::{Repositories, UserRepository};
//!
//! let repos = Repositories::in_memory();
//! let user = repos.users.find_by_email("user@example.com").await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod repo;

pub use error::{DbError, DbResult};
pub use memory::{MemoryProjectRepository, MemoryUserRepository, Repositories};
pub use models::*;
pub use repo::*;
