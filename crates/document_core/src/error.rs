//! Domain error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown outline node: {0}")]
    UnknownNode(String),

    #[error("Outline already registered")]
    OutlineAlreadyRegistered,
}
