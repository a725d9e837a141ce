//! Error types for completion providers.

use thiserror::Error;

/// Result alias for provider operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors that can occur when talking to a completion provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider is missing its credential or endpoint.
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Reply text was not valid JSON after removing code fences.
    #[error("Failed to parse AI response as JSON: {reason}")]
    ResponseParse { reason: String, raw: String },
}
