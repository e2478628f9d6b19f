//! In-memory repository implementations

mod project;
mod user;

pub use project::MemoryProjectRepository;
pub use user::MemoryUserRepository;

/// All repositories bundled together
#[derive(Clone, Default)]
pub struct Repositories {
    pub users: MemoryUserRepository,
    pub projects: MemoryProjectRepository,
}

impl Repositories {
    /// Create empty in-memory repositories
    pub fn in_memory() -> Self {
        Self::default()
    }
}
