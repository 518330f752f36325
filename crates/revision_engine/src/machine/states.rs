//! Patch session states - the lifecycle of one selection-scoped edit.

use serde::{Deserialize, Serialize};

/// States of a patch session over the current document view.
///
/// A session always returns to `Idle`: on apply, on discard, or on a
/// failed suggestion. The version chain is only touched on apply.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PatchSessionState {
    /// No selection; awaiting user input.
    Idle,

    /// The user has selected a span of the current content.
    Selected {
        selection_start: usize,
        selection_end: usize,
        selected_text: String,
    },

    /// A suggestion request is in flight to the external adapter. The only
    /// suspension point in the engine; cancellable without side effects.
    AwaitingSuggestion {
        selected_text: String,
        selection_start: usize,
        instruction: String,
    },

    /// A suggestion arrived and is waiting for the user to apply or
    /// discard it.
    SuggestionReady {
        selected_text: String,
        selection_start: usize,
        instruction: String,
        suggestion_text: String,
        explanation: Option<String>,
        confidence: Option<f32>,
    },
}

impl Default for PatchSessionState {
    fn default() -> Self {
        PatchSessionState::Idle
    }
}

impl PatchSessionState {
    /// Check if this state is waiting on the external adapter.
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::AwaitingSuggestion { .. })
    }

    /// Check if this state allows a new selection to be made.
    pub fn accepts_selection(&self) -> bool {
        matches!(self, Self::Idle | Self::Selected { .. })
    }

    /// Get a human-readable description of the current state.
    pub fn description(&self) -> &str {
        match self {
            Self::Idle => "Ready for selection",
            Self::Selected { .. } => "Span selected",
            Self::AwaitingSuggestion { .. } => "Waiting for suggestion",
            Self::SuggestionReady { .. } => "Suggestion ready",
        }
    }
}
