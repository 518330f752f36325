//! Scripted in-memory providers for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::models::{GeneratedSection, SectionRequest, Suggestion, SuggestionRequest};
use crate::provider::{SectionGenerator, SuggestionProvider};
use crate::Result;

/// Returns scripted responses in order; errors once the script runs out.
#[derive(Default)]
pub struct ScriptedSuggestionProvider {
    responses: Mutex<VecDeque<Result<Suggestion>>>,
}

impl ScriptedSuggestionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_suggestion(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Suggestion::new(text.to_string(), None, Some(0.9))));
    }

    pub fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(AdapterError::GenerationFailed(message.to_string())));
    }
}

#[async_trait]
impl SuggestionProvider for ScriptedSuggestionProvider {
    async fn suggest(&self, _request: SuggestionRequest) -> Result<Suggestion> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AdapterError::EmptyResponse))
    }
}

/// Echoes the answered questions back as fixed prose.
#[derive(Default)]
pub struct EchoSectionGenerator;

#[async_trait]
impl SectionGenerator for EchoSectionGenerator {
    async fn generate(&self, request: SectionRequest) -> Result<GeneratedSection> {
        if request.qa_pairs.is_empty() {
            return Err(AdapterError::GenerationFailed(
                "no answered questions".to_string(),
            ));
        }
        let body = request
            .qa_pairs
            .iter()
            .map(|p| format!("{} {}", p.question, p.answer))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(GeneratedSection {
            content: format!("{}: {}", request.subsection_title, body),
        })
    }
}

/// A provider that hangs until cancelled; used to test cancellation of the
/// suspension point.
#[derive(Default)]
pub struct PendingSuggestionProvider;

#[async_trait]
impl SuggestionProvider for PendingSuggestionProvider {
    async fn suggest(&self, _request: SuggestionRequest) -> Result<Suggestion> {
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_provider_plays_in_order() {
        let provider = ScriptedSuggestionProvider::new();
        provider.push_suggestion("Earth");
        provider.push_failure("rate limited");

        let request = SuggestionRequest {
            selected_text: "world".to_string(),
            instruction: "planet".to_string(),
            full_content: "Hello world".to_string(),
        };

        let first = provider.suggest(request.clone()).await.unwrap();
        assert_eq!(first.suggestion_text, "Earth");

        let second = provider.suggest(request.clone()).await;
        assert!(matches!(second, Err(AdapterError::GenerationFailed(_))));

        let exhausted = provider.suggest(request).await;
        assert!(matches!(exhausted, Err(AdapterError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_echo_generator_requires_answers() {
        let generator = EchoSectionGenerator;
        let empty = generator
            .generate(SectionRequest {
                section_title: "Introduction".to_string(),
                subsection_title: "Purpose".to_string(),
                qa_pairs: vec![],
            })
            .await;
        assert!(empty.is_err());
    }
}
