//! Provider traits for the external collaborators.

use async_trait::async_trait;

use crate::models::{GeneratedSection, SectionRequest, Suggestion, SuggestionRequest};
use crate::Result;

/// Produces a replacement for a selected span of the document.
///
/// This call is the only suspension point in the patch engine. Callers may
/// cancel it; cancellation simply discards the pending suggestion and has
/// no side effects on any store.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, request: SuggestionRequest) -> Result<Suggestion>;
}

/// Produces prose for one subsection from its answered questions.
#[async_trait]
pub trait SectionGenerator: Send + Sync {
    async fn generate(&self, request: SectionRequest) -> Result<GeneratedSection>;
}
