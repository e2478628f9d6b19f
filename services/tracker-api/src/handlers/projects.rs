//! Project handlers
//!
//! Creation is admin-only; any authenticated user may list.

use std::collections::{HashMap, HashSet};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracker_axum::{RequireAdmin, RequireAuth};
use tracker_db::{CreateProject, ProjectRepository};
use tracker_types::{CreateProjectRequest, Project, ProjectView, PublicUser, UserId, ValidationErrors};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/projects
///
/// The admin check happens during extraction, before the body is read.
pub async fn create_project(
    State(state): State<AppState>,
    admin: RequireAdmin,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let Json(req) = payload?;

    let mut errors = ValidationErrors::new();
    errors.require("name", &req.name);

    // Keep first occurrence order, drop repeats
    let mut seen = HashSet::new();
    let assigned_users: Vec<UserId> = req
        .assigned_users
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();

    if !assigned_users.is_empty() {
        let known: HashSet<UserId> = state
            .auth
            .list_users()
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();
        for id in assigned_users.iter().filter(|id| !known.contains(id)) {
            errors.add("assignedUsers", format!("unknown user {id}"));
        }
    }

    errors.into_result().map_err(ApiError::Validation)?;

    let description = req
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let project = state
        .store(
            "create_project",
            state.repos.projects.create(CreateProject {
                name: req.name.trim().to_string(),
                description,
                assigned_users,
                created_by: admin.user_id,
            }),
        )
        .await?;

    tracing::info!(project_id = %project.id, created_by = %admin.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects
///
/// Projects with member and creator ids resolved to public user views
pub async fn list_projects(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> ApiResult<Json<Vec<ProjectView>>> {
    let projects = state
        .store("list_projects", state.repos.projects.list())
        .await?;
    let users: HashMap<UserId, PublicUser> = state
        .auth
        .list_users()
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let views = projects
        .into_iter()
        .map(|project| populate(project, &users))
        .collect();

    Ok(Json(views))
}

/// Resolve user references; ids no longer in the store are dropped
fn populate(project: Project, users: &HashMap<UserId, PublicUser>) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        description: project.description,
        assigned_users: project
            .assigned_users
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect(),
        created_by: users.get(&project.created_by).cloned(),
        created_at: project.created_at,
    }
}
