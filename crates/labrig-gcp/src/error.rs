//! Google Cloud plumbing error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcpError {
    #[error("gcloud not found. Please install the Google Cloud SDK")]
    GcloudNotFound,

    #[error("gcloud authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("gcloud command failed: {0}")]
    CommandFailed(String),

    #[error("{api} API error: {message}")]
    ApiError { api: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GcpError>;
