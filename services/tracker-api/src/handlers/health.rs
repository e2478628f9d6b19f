//! Health check handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::time::Instant;
use tracker_db::UserRepository;
use tracker_types::UserId;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyChecks {
    pub store: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    pub latency_ms: u64,
}

/// GET /health - Liveness probe (fast, no dependencies)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "tracker-api",
    })
}

/// GET /ready - Readiness probe (checks the store answers in time)
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, StatusCode> {
    let start = Instant::now();

    let probe = state
        .store("ready_probe", state.repos.users.find_by_id(UserId::new()))
        .await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match probe {
        Ok(_) => Ok(Json(ReadyResponse {
            status: "ready",
            service: "tracker-api",
            checks: ReadyChecks {
                store: CheckResult {
                    status: "ok",
                    latency_ms,
                },
            },
        })),
        // Return 503 if any check fails
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}
