//! Revision engine error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevisionError {
    #[error("Selection [{start}, {end}) is outside content of length {content_len}")]
    OutOfRangeSelection {
        start: usize,
        end: usize,
        content_len: usize,
    },

    #[error("Version {0} does not exist (chain has {1} versions)")]
    VersionNotFound(u64, u64),

    #[error("Cannot patch an empty version chain")]
    EmptyChain,

    #[error("Version chain integrity violated: {0}")]
    ChainIntegrity(String),
}
