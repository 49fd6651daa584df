//! Error types for the admin web interface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur in the admin web interface.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Malformed request input.
    #[error("{0}")]
    BadRequest(String),

    /// Well-formed input the store refused.
    #[error("{0}")]
    Rejected(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<honors_core::HonorsError> for AdminError {
    fn from(err: honors_core::HonorsError) -> Self {
        match err {
            honors_core::HonorsError::InvalidDate(_) | honors_core::HonorsError::DuplicateHonor(_) => {
                AdminError::BadRequest(err.to_string())
            }
            honors_core::HonorsError::Rejected(msg) => AdminError::Rejected(msg),
            other => AdminError::Internal(other.to_string()),
        }
    }
}

impl AdminError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AdminError::Database(database::DatabaseError::Invalid(_))
            | AdminError::Database(database::DatabaseError::NotFound { .. })
            | AdminError::Rejected(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AdminError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AdminError::Database(_) | AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show an operator.
    pub fn message(&self) -> String {
        match self {
            AdminError::Database(database::DatabaseError::Invalid(msg)) => msg.clone(),
            AdminError::Database(err) => err.to_string(),
            AdminError::BadRequest(msg) | AdminError::Rejected(msg) | AdminError::Internal(msg) => {
                msg.clone()
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = serde_json::json!({
            "error": self.message()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
