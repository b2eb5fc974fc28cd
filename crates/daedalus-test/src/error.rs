//! Test error types.

use thiserror::Error;

/// Errors raised while building a request or reading a response.
#[derive(Debug, Error)]
pub enum TestError {
    /// Request building failed.
    #[error("request build error: {0}")]
    RequestBuild(String),
    /// Header name or value is invalid.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// Response body is not what the caller asked for.
    #[error("body read error: {0}")]
    BodyRead(String),
    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
