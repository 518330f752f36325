//! `suggestion_adapter` defines the seams to the two external LLM-backed
//! collaborators: the content suggestion adapter used by the patch flow and
//! the section content generator used by the section builder. The engine
//! only consumes their structured outputs.

pub mod error;
pub mod mock;
pub mod models;
pub mod provider;

// Re-export the public API
pub use error::AdapterError;
pub use models::{GeneratedSection, SectionRequest, Suggestion, SuggestionRequest};
pub use provider::{SectionGenerator, SuggestionProvider};

pub type Result<T> = std::result::Result<T, AdapterError>;
