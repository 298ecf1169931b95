//! HTTP error mapping.
//!
//! [`ServerError`] is what handlers return on the failure path. Its
//! [`IntoResponse`] impl maps every variant onto a status code and the
//! shared `{message}` error body, so callers see one error shape across
//! the whole surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use punchlist_core::ErrorBody;
use punchlist_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Requested task does not exist.
    #[error("Task not found")]
    TaskNotFound,

    /// Persistence failure.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Listener could not be bound.
    #[error("bind error: {0}")]
    Bind(#[from] std::io::Error),
}

impl ServerError {
    /// Status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::TaskNotFound | Self::Store(StoreError::TaskNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Store(_) | Self::Bind(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire message for the error body. Missing tasks always read
    /// `"Task not found"` regardless of which layer noticed.
    #[must_use]
    pub fn message(&self) -> String {
        if self.status_code() == StatusCode::NOT_FOUND {
            "Task not found".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
