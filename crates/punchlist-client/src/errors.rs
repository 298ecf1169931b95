//! Error types for the API client.

use thiserror::Error;

/// Errors that can occur while talking to the task API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure inside reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON the route promises.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body text.
        message: String,
    },

    /// A success response that should have carried a task did not.
    #[error("response did not include a task")]
    MissingTask,
}

/// Convenience type alias for client results.
pub type Result<T> = std::result::Result<T, ApiError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
