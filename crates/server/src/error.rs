//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Errors render as
//! `{"error": "<message>"}`; server-side failures are captured to Sentry and
//! logged before responding, and their details never reach the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::csv::ExportError;
use crate::services::intake::IntakeError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected input.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or state conflict.
    #[error("{0}")]
    Conflict(String),

    /// The server is missing required configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Configuration(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Database(_) | Self::Internal(_)
        )
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NeedsSingleType => Self::Validation(err.to_string()),
            ExportError::Store(e) => Self::Database(e),
            ExportError::Csv(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Database error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Configuration(_) => "Admin not configured".to_string(),
            _ => self.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
