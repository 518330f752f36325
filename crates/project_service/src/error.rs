//! Project service error types

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    #[error("Project has no committed document yet")]
    NoDocument,

    #[error("No pending selection for this project")]
    NoPendingSelection,

    #[error("A suggestion is already in flight or awaiting review")]
    SessionBusy,

    #[error("Concurrent write detected: expected chain tip {expected}, found {actual}")]
    ConcurrencyConflict { expected: u64, actual: u64 },

    #[error(transparent)]
    Document(#[from] document_core::DocumentError),

    #[error(transparent)]
    Revision(#[from] revision_engine::RevisionError),

    #[error(transparent)]
    Generation(#[from] suggestion_adapter::AdapterError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
