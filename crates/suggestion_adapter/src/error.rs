//! Adapter error types

use thiserror::Error;

/// Failures from the external generation collaborators. Always retryable by
/// the caller: a failed call leaves the document and stores untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Adapter returned an empty response")]
    EmptyResponse,
}
