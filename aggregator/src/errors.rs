use http::StatusCode;
use thiserror::Error;

/// Errors surfaced by the HTTP service itself
#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("Response serialization error: {0}")]
    ResponseSerializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] crate::config::ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single source could not be fetched.
///
/// Only the most recent error is kept once a source exhausts its attempts.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {0} failed: {1}")]
    Transport(String, String),

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Status code is not 2xx for {0}: {1}")]
    UpstreamStatus(String, StatusCode),

    #[error("Failed to parse response from {0}: {1}")]
    Decode(String, String),

    #[error("Fetch worker for {0} failed: {1}")]
    WorkerFailed(String, String),
}

impl FetchError {
    /// Short label used to tag metrics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(..) => "transport",
            FetchError::Timeout(..) => "timeout",
            FetchError::UpstreamStatus(..) => "status",
            FetchError::Decode(..) => "decode",
            FetchError::WorkerFailed(..) => "worker",
        }
    }
}
