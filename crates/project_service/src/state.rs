//! Persisted per-project state.

use document_core::{AnswerStore, Outline, SectionStore};
use revision_engine::VersionChain;
use serde::{Deserialize, Serialize};

/// Everything durable about one project: the registered outline, the
/// answered questions, the saved section content, and the version chain
/// (including its view pointer, so undo survives a reload).
///
/// The patch-session state machine is deliberately *not* part of this:
/// a selection in flight is ephemeral and dies with the process.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProjectState {
    pub outline: Option<Outline>,
    pub answers: AnswerStore,
    pub sections: SectionStore,
    pub chain: VersionChain,
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }
}
