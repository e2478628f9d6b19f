//! Error types for the Tracker API service.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracker_auth_core::AuthError;
use tracker_db::DbError;
use tracker_types::ValidationErrors;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body was not the expected JSON
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field validation outside the auth flows
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Auth flow or store failure
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::Auth(AuthError::from(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Auth(err) => err.error_code(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        let errors = match self {
            Self::Validation(errors) | Self::Auth(AuthError::Validation(errors)) => errors,
            _ => return None,
        };
        serde_json::to_value(errors).ok()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log internal errors
        if matches!(&self, Self::Auth(err) if err.is_internal()) {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
