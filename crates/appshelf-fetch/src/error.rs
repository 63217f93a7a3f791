//! Error types for appshelf-fetch.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Map any client error into the network variant, keeping its message.
    pub fn network<E: std::error::Error>(e: E) -> Self {
        FetchError::Network(e.to_string())
    }
}
