//! Cross-cutting error types for Cairn.
//!
//! Domain-specific errors (`CacheError`, `ClientError`, `ConfigError`) are
//! defined in their respective crates; this module holds errors that can
//! originate anywhere in the system.

use thiserror::Error;

/// Errors that can be raised by any Cairn crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A payload did not have the shape the wire contract promises.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
