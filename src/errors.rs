//! Error types for StudyBuddy
//!
//! Two families of errors exist:
//! - [`TutorError`]: store, configuration and input errors raised by the crate
//! - [`GenerationError`]: failures of the external text-generation collaborator
//!
//! The decision engine itself never surfaces either to its callers; they are
//! converted into degraded-but-typed results at the component boundaries.

use thiserror::Error;

/// Main error type for the tutoring engine
#[derive(Error, Debug)]
pub enum TutorError {
    /// Interaction or context store failures
    #[error("Store error: {0}")]
    Store(String),

    /// Topic name or id that does not resolve through the registry
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// Interaction record that violates the data model
    #[error("Invalid interaction record: {0}")]
    InvalidRecord(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Collaborator failures that reached a surface which reports them
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Failure of a call to the text-generation collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// HTTP 429 persisted through every attempt
    #[error("Upstream HTTP 429 after {attempts} attempts (retry after {retry_after:?}s)")]
    RateLimited {
        retry_after: Option<u64>,
        body: Option<String>,
        attempts: u32,
    },

    /// Non-success status or transport failure
    #[error("Upstream request failed (status {status:?}): {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },

    /// Request exceeded the configured timeout
    #[error("Upstream request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Provider is missing credentials or an endpoint
    #[error("Generation client not configured: {0}")]
    NotConfigured(String),

    /// Response decoded but carried no text
    #[error("Empty response from generation service")]
    EmptyResponse,
}

impl GenerationError {
    /// Retry hint in seconds, when the upstream supplied one
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            GenerationError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Diagnostic body returned by the upstream, if any
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            GenerationError::RateLimited { body, .. } | GenerationError::Upstream { body, .. } => {
                body.as_deref()
            }
            _ => None,
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, TutorError>;
