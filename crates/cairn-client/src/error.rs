//! Client error types.

use thiserror::Error;

/// Errors from talking to the job runner API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error (connection, timeout, TLS, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The runner returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the runner.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// A response payload did not have the promised shape.
    #[error("parse error: {0}")]
    Parse(String),
}
