//! Authentication handlers (register, login, me, users)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracker_axum::RequireAuth;
use tracker_types::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, Role, UserId};

use crate::error::ApiResult;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
///
/// Create an account and sign the new user in
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(req) = payload?;

    let user = state.auth.register(req).await?;
    let issued = state.auth.issue_for(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            token: issued.token,
        }),
    ))
}

/// POST /api/auth/login
///
/// Exchange email and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;
    Ok(Json(state.auth.login(req).await?))
}

/// GET /api/auth/me
///
/// Identity carried by the presented token
pub async fn me(auth: RequireAuth) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.user_id,
        role: auth.role,
        expires_at: auth.expires_at,
    })
}

/// GET /api/auth/users
///
/// All registered users, for project assignment
pub async fn list_users(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> ApiResult<Json<Vec<PublicUser>>> {
    Ok(Json(state.auth.list_users().await?))
}
