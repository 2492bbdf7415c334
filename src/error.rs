// Error types for folio.
// Covers GitHub API failures, local store failures, and general application errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimitExceeded,

    #[error("GitHub API error: {status} {status_text}")]
    Upstream { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Local store error: {0}")]
    Persistence(String),

    #[error("No GitHub username configured")]
    MissingUsername,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<crate::http::HttpError> for FolioError {
    fn from(err: crate::http::HttpError) -> Self {
        FolioError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
