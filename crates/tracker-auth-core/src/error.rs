//! Auth errors

use thiserror::Error;
use tracker_db::DbError;
use tracker_types::ValidationErrors;

use crate::password::PasswordError;

/// Authentication and authorization errors.
///
/// `Display` is the safe outward message; variants carrying internal detail
/// keep it out of the message and expose it only through `Debug` for logs.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Request failed field validation
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Email already registered
    #[error("email already registered")]
    Conflict,

    /// Unknown email or wrong password; the two are not distinguished
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, tampered or expired token
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated but the role is not allowed here
    #[error("insufficient permissions")]
    Forbidden,

    /// Password hashing failed
    #[error("internal error")]
    Hashing(String),

    /// Token signing failed
    #[error("internal error")]
    Signing(String),

    /// Credential store failed
    #[error("internal error")]
    Store(String),

    /// Credential store did not answer in time
    #[error("service temporarily unavailable")]
    StoreTimeout(&'static str),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidCredentials | Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::Conflict => 409,
            Self::Hashing(_) | Self::Signing(_) | Self::Store(_) => 500,
            Self::StoreTimeout(_) => 503,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict => "CONFLICT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::Hashing(_) | Self::Signing(_) | Self::Store(_) => "INTERNAL_ERROR",
            Self::StoreTimeout(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Whether this is an infrastructure failure that must be logged
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Hashing(_) | Self::Signing(_) | Self::Store(_) | Self::StoreTimeout(_)
        )
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(_) => Self::Conflict,
            other => {
                tracing::error!("Credential store error: {}", other);
                Self::Store(other.to_string())
            }
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        Self::Hashing(err.to_string())
    }
}
