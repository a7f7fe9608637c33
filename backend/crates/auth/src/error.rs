//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Caller input malformed or missing
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or invalid/stale/expired token
    #[error("{0}")]
    Authentication(String),

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Email or username already registered
    #[error("User with email or username already exists")]
    IdentifierTaken,

    /// Required media upload failed
    #[error("File upload failed: {0}")]
    Upload(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Generic credential failure.
    ///
    /// One message for both wrong password and unknown identifier, so a
    /// response never reveals which half of the pair was wrong.
    pub fn invalid_credentials() -> Self {
        AuthError::Authentication("Invalid user credentials".to_string())
    }

    /// Presented refresh token is no longer the stored one.
    pub fn stale_refresh_token() -> Self {
        AuthError::Authentication("Refresh token is used or expired".to_string())
    }

    /// No token was presented at all.
    pub fn unauthorized() -> Self {
        AuthError::Authentication("Unauthorized".to_string())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::IdentifierTaken => StatusCode::CONFLICT,
            AuthError::Upload(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Authentication(_) => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::IdentifierTaken => ErrorKind::Conflict,
            AuthError::Upload(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Upload(msg) => {
                tracing::error!(message = %msg, "Media upload failed");
            }
            AuthError::Authentication(_) => {
                tracing::warn!("Authentication failure");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
