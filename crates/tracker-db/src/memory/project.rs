//! In-memory project repository

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracker_types::{Project, ProjectId};

use crate::error::DbResult;
use crate::models::CreateProject;
use crate::repo::ProjectRepository;

/// In-memory project repository
#[derive(Default, Clone)]
pub struct MemoryProjectRepository {
    projects: Arc<DashMap<ProjectId, (u64, Project)>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn create(&self, project: CreateProject) -> DbResult<Project> {
        let project = Project {
            id: ProjectId::new(),
            name: project.name,
            description: project.description,
            assigned_users: project.assigned_users,
            created_by: project.created_by,
            created_at: Utc::now(),
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.projects.insert(project.id, (seq, project.clone()));
        Ok(project)
    }

    async fn list(&self) -> DbResult<Vec<Project>> {
        let mut rows: Vec<(u64, Project)> =
            self.projects.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, project)| project).collect())
    }
}
