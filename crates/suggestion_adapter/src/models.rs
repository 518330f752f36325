//! Request/response models for the generation collaborators.

use document_core::QaPair;
use serde::{Deserialize, Deserializer, Serialize};

/// Input to the content suggestion adapter.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub selected_text: String,
    pub instruction: String,
    /// Full document at request time, for context only. Occurrences are
    /// recounted against the freshest content at apply time.
    pub full_content: String,
}

/// A structured suggestion from the adapter. Confidence is clamped into
/// [0, 1] both in [`Suggestion::new`] and when deserialized, so a value
/// read off the wire upholds the same bound.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Suggestion {
    pub suggestion_text: String,
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "clamped_confidence")]
    pub confidence: Option<f32>,
}

fn clamped_confidence<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let confidence = Option::<f32>::deserialize(deserializer)?;
    Ok(confidence.map(|c| c.clamp(0.0, 1.0)))
}

impl Suggestion {
    /// Build a suggestion, clamping any reported confidence into [0, 1].
    pub fn new(
        suggestion_text: String,
        explanation: Option<String>,
        confidence: Option<f32>,
    ) -> Self {
        Self {
            suggestion_text,
            explanation,
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
        }
    }
}

/// Input to the section content generator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SectionRequest {
    pub section_title: String,
    pub subsection_title: String,
    pub qa_pairs: Vec<QaPair>,
}

/// Generated prose for one subsection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GeneratedSection {
    pub content: String,
}
