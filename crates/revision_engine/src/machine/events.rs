//! Patch session events - everything that can advance an edit flow.

/// Events that drive [`super::PatchStateMachine`].
#[derive(Debug, Clone, PartialEq)]
pub enum PatchEvent {
    /// The user selected `[selection_start, selection_end)` of the current
    /// content.
    SpanSelected {
        selection_start: usize,
        selection_end: usize,
        selected_text: String,
    },

    /// The user asked for a suggestion for the selected span.
    SuggestionRequested { instruction: String },

    /// The adapter returned a suggestion.
    SuggestionReceived {
        suggestion_text: String,
        explanation: Option<String>,
        confidence: Option<f32>,
    },

    /// The adapter failed or the request was cancelled; the chain stays
    /// untouched.
    SuggestionFailed { error: String },

    /// The suggestion was applied and a new version appended.
    PatchApplied { version_number: u64 },

    /// The user discarded the pending suggestion.
    SuggestionDiscarded,

    /// The user cleared the selection without requesting anything.
    SelectionCleared,
}

impl PatchEvent {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SpanSelected { .. } => "span_selected",
            Self::SuggestionRequested { .. } => "suggestion_requested",
            Self::SuggestionReceived { .. } => "suggestion_received",
            Self::SuggestionFailed { .. } => "suggestion_failed",
            Self::PatchApplied { .. } => "patch_applied",
            Self::SuggestionDiscarded => "suggestion_discarded",
            Self::SelectionCleared => "selection_cleared",
        }
    }
}
