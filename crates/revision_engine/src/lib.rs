//! `revision_engine` owns the append-only version chain for a document and
//! the selection-scoped patch operations over it: immutable snapshots, a
//! current-view pointer for undo/history browsing, occurrence-ambiguity
//! detection, and the patch-session state machine.

pub mod chain;
pub mod error;
pub mod machine;
pub mod patch;
pub mod version;

// Re-export the public API
pub use chain::VersionChain;
pub use error::RevisionError;
pub use machine::{PatchEvent, PatchSessionState, PatchStateMachine, StateTransition};
pub use patch::{count_occurrences, PatchArgs, PatchOutcome, PatchRequest};
pub use version::{Author, ChangedSpan, Version, VersionMeta};

pub type Result<T> = std::result::Result<T, RevisionError>;
