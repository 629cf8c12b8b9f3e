use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Reasoning service error: {0}")]
    Provider(String),

    #[error("Could not decode analysis: {reason}")]
    Decode { reason: String, raw: String },

    #[error("Cannot summarize a session without analyzed answers")]
    EmptySummary,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn decode(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::Decode {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Transport and provider failures leave no partial state behind, so the
    /// caller may resubmit the same answer. Decode failures are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Provider(_) | Error::Reqwest(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let retryable = self.is_retryable();
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Provider(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Reasoning service error: {}", msg),
            ),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Decode { reason, .. } => (
                StatusCode::BAD_GATEWAY,
                format!("Analysis could not be decoded: {}", reason),
            ),
            Error::EmptySummary => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "No analyzed answers to summarize".to_string(),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message, "retryable": retryable }));
        (status, body).into_response()
    }
}
