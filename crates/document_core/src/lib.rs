//! `document_core` holds the pure domain model for outline-driven
//! requirements documents: the outline registry, per-subsection answers,
//! the approved-content store, and the deterministic assembler.

pub mod answers;
pub mod assembler;
pub mod error;
pub mod outline;
pub mod sections;

// Re-export the public API
pub use answers::{AnswerStore, QaPair};
pub use assembler::assemble;
pub use error::DocumentError;
pub use outline::{Outline, OutlineLeaf, OutlineSection};
pub use sections::{Completion, SectionKey, SectionRecord, SectionStatus, SectionStore};

pub type Result<T> = std::result::Result<T, DocumentError>;
