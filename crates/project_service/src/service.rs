//! Project service - the single-writer orchestration layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use document_core::{
    assemble, Completion, DocumentError, Outline, OutlineSection, SectionKey, SectionStatus,
};
use revision_engine::{
    Author, PatchArgs, PatchEvent, PatchOutcome, PatchRequest, PatchSessionState,
    PatchStateMachine, VersionMeta,
};
use suggestion_adapter::{
    SectionGenerator, SectionRequest, Suggestion, SuggestionProvider, SuggestionRequest,
};

use crate::error::ServiceError;
use crate::state::ProjectState;
use crate::storage::ProjectStorage;
use crate::Result;

/// History metadata for one version, without the full content.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VersionSummary {
    pub number: u64,
    pub author: Author,
    pub instruction: Option<String>,
    pub created_at: DateTime<Utc>,
}

struct ProjectEntry {
    state: ProjectState,
    /// Ephemeral patch session; never persisted.
    session: PatchStateMachine,
}

/// Per-project authoring service.
///
/// One lock per project serializes every mutation on that project, so two
/// writers can never both observe chain length `n` and both append version
/// `n + 1`: the loser of a race fails with `ConcurrencyConflict` and must
/// reload current content before retrying. Reads clone a snapshot out
/// under the lock and never observe a torn version. Different projects
/// share nothing.
pub struct ProjectService<S: ProjectStorage> {
    storage: Arc<S>,
    projects: DashMap<Uuid, Arc<RwLock<ProjectEntry>>>,
}

impl<S: ProjectStorage> ProjectService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
            projects: DashMap::new(),
        }
    }

    /// Get the in-memory entry for a project, loading it from storage on
    /// first touch. An unknown project starts empty.
    async fn entry(&self, project_id: Uuid) -> Result<Arc<RwLock<ProjectEntry>>> {
        if let Some(entry) = self.projects.get(&project_id) {
            return Ok(entry.clone());
        }

        let state = match self.storage.load_project(project_id).await {
            Ok(state) => state,
            Err(ServiceError::ProjectNotFound(_)) => ProjectState::new(),
            Err(e) => return Err(e),
        };

        let entry = self
            .projects
            .entry(project_id)
            .or_insert_with(|| {
                Arc::new(RwLock::new(ProjectEntry {
                    state,
                    session: PatchStateMachine::new(),
                }))
            })
            .clone();
        Ok(entry)
    }

    async fn persist(&self, project_id: Uuid, state: &ProjectState) -> Result<()> {
        self.storage.save_project(project_id, state).await
    }

    // ========== Outline and answers ==========

    /// Register the outline for a project. The outline is immutable once
    /// registered.
    pub async fn register_outline(
        &self,
        project_id: Uuid,
        sections: Vec<OutlineSection>,
    ) -> Result<()> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        if guard.state.outline.is_some() {
            return Err(DocumentError::OutlineAlreadyRegistered.into());
        }
        let outline = Outline::register(sections)?;
        tracing::debug!(%project_id, leaves = outline.leaf_count(), "outline registered");
        guard.state.outline = Some(outline);
        self.persist(project_id, &guard.state).await
    }

    /// Record (or overwrite) an answer to one of a leaf's prompt questions.
    pub async fn record_answer(
        &self,
        project_id: Uuid,
        key: SectionKey,
        question: String,
        answer: String,
    ) -> Result<()> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        self.require_leaf(&guard.state, &key)?;
        guard.state.answers.record(key, question, answer);
        self.persist(project_id, &guard.state).await
    }

    // ========== Section content ==========

    /// Generate content for a subsection from its answered questions via
    /// the external generator, then save it as a draft.
    ///
    /// The adapter call happens outside the project lock and nothing is
    /// written until it returns, so a failed or cancelled call leaves the
    /// project untouched.
    pub async fn generate_section(
        &self,
        project_id: Uuid,
        key: SectionKey,
        generator: &dyn SectionGenerator,
    ) -> Result<String> {
        let entry = self.entry(project_id).await?;

        let request = {
            let guard = entry.read().await;
            let outline = self.require_outline(&guard.state)?;
            let section = outline
                .sections()
                .iter()
                .find(|s| s.id == key.section_id)
                .ok_or_else(|| DocumentError::UnknownNode(key.section_id.clone()))?;
            let leaf = outline
                .leaf(&key.section_id, &key.subsection_id)
                .ok_or_else(|| DocumentError::UnknownNode(key.subsection_id.clone()))?;

            let qa_pairs = guard.state.answers.answers_for(&key).to_vec();
            if qa_pairs.is_empty() {
                return Err(DocumentError::Validation(format!(
                    "no answered questions for {}",
                    key.subsection_id
                ))
                .into());
            }

            SectionRequest {
                section_title: section.title.clone(),
                subsection_title: leaf.title.clone(),
                qa_pairs,
            }
        };

        let generated = generator.generate(request).await?;

        let mut guard = entry.write().await;
        guard
            .state
            .sections
            .upsert(key, generated.content.clone(), SectionStatus::Draft);
        self.persist(project_id, &guard.state).await?;
        Ok(generated.content)
    }

    /// Save content for a subsection directly. Returns the number of
    /// distinct keys saved so far.
    pub async fn upsert_section(
        &self,
        project_id: Uuid,
        key: SectionKey,
        content: String,
        status: SectionStatus,
    ) -> Result<usize> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        self.require_leaf(&guard.state, &key)?;
        let saved = guard.state.sections.upsert(key, content, status);
        self.persist(project_id, &guard.state).await?;
        Ok(saved)
    }

    /// Approve a previously saved subsection, making it part of the
    /// assembled document. Returns false if nothing was saved for the key.
    pub async fn approve_section(&self, project_id: Uuid, key: SectionKey) -> Result<bool> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        let approved = guard.state.sections.approve(&key);
        if approved {
            self.persist(project_id, &guard.state).await?;
        }
        Ok(approved)
    }

    /// Completion metric over the registered outline. Snapshot read.
    pub async fn completion(&self, project_id: Uuid) -> Result<Completion> {
        let entry = self.entry(project_id).await?;
        let guard = entry.read().await;
        let outline = self.require_outline(&guard.state)?;
        Ok(guard.state.sections.completion(outline))
    }

    /// Assemble the current full document text. Snapshot read; pure
    /// function of the outline and the section store.
    pub async fn assemble_document(&self, project_id: Uuid) -> Result<String> {
        let entry = self.entry(project_id).await?;
        let guard = entry.read().await;
        let outline = self.require_outline(&guard.state)?;
        Ok(assemble(outline, &guard.state.sections))
    }

    // ========== Version chain ==========

    /// Commit the assembled document as a new version. The first commit
    /// seeds version 1 of the chain.
    pub async fn commit_document(&self, project_id: Uuid, author: Author) -> Result<u64> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        let outline = self.require_outline(&guard.state)?;
        let text = assemble(outline, &guard.state.sections);
        let number = guard
            .state
            .chain
            .append_version(text, author, VersionMeta::default());
        self.persist(project_id, &guard.state).await?;
        Ok(number)
    }

    /// Seed the chain from externally supplied text (an uploaded
    /// document), bypassing assembly.
    pub async fn seed_document(
        &self,
        project_id: Uuid,
        content: String,
        author: Author,
    ) -> Result<u64> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        let number = guard
            .state
            .chain
            .append_version(content, author, VersionMeta::default());
        self.persist(project_id, &guard.state).await?;
        Ok(number)
    }

    /// Content of the version the view pointer currently rests on.
    pub async fn current_content(&self, project_id: Uuid) -> Result<String> {
        let entry = self.entry(project_id).await?;
        let guard = entry.read().await;
        guard
            .state
            .chain
            .current_content()
            .map(str::to_string)
            .ok_or(ServiceError::NoDocument)
    }

    /// Chain length (the number of the tip version; 0 when empty). This is
    /// the `base_version` a caller passes back into [`Self::apply_patch`].
    pub async fn chain_length(&self, project_id: Uuid) -> Result<u64> {
        let entry = self.entry(project_id).await?;
        let guard = entry.read().await;
        Ok(guard.state.chain.len())
    }

    /// Move the view pointer to version `k` without mutating the chain;
    /// this is undo/history browsing. Returns that version's content.
    pub async fn select_version(&self, project_id: Uuid, k: u64) -> Result<String> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        let content = guard.state.chain.select_version(k)?.content.clone();
        // The pointer is durable so an undo survives a reload.
        self.persist(project_id, &guard.state).await?;
        Ok(content)
    }

    /// Version metadata, oldest first.
    pub async fn history(&self, project_id: Uuid) -> Result<Vec<VersionSummary>> {
        let entry = self.entry(project_id).await?;
        let guard = entry.read().await;
        Ok(guard
            .state
            .chain
            .versions()
            .iter()
            .map(|v| VersionSummary {
                number: v.number,
                author: v.author,
                instruction: v.instruction.clone(),
                created_at: v.created_at,
            })
            .collect())
    }

    // ========== Patch flow ==========

    /// Start a patch session by selecting `[start, end)` of the currently
    /// viewed content.
    pub async fn request_patch(
        &self,
        project_id: Uuid,
        start: usize,
        end: usize,
    ) -> Result<PatchRequest> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        // The session ignores selections while a suggestion is in flight
        // or awaiting review; surface that instead of returning a
        // selection the session never recorded.
        if !guard.session.state().accepts_selection() {
            return Err(ServiceError::SessionBusy);
        }

        let snapshot = guard
            .state
            .chain
            .current_content()
            .ok_or(ServiceError::NoDocument)?;
        let request = PatchRequest::from_selection(start, end, snapshot)?;

        guard.session.handle_event(PatchEvent::SpanSelected {
            selection_start: request.selection_start,
            selection_end: request.selection_end,
            selected_text: request.selected_text.clone(),
        });
        Ok(request)
    }

    /// Ask the suggestion adapter for a replacement of the selected span.
    ///
    /// The only suspension point in the engine. The project lock is not
    /// held across the adapter call and nothing is appended here, so the
    /// caller may cancel at any time: cancellation (or an adapter failure)
    /// discards the pending suggestion and leaves the document exactly as
    /// it was. Returns `Ok(None)` when cancelled.
    pub async fn resolve_suggestion(
        &self,
        project_id: Uuid,
        instruction: String,
        provider: &dyn SuggestionProvider,
        cancel: &CancellationToken,
    ) -> Result<Option<Suggestion>> {
        let entry = self.entry(project_id).await?;

        let request = {
            let mut guard = entry.write().await;
            let selected_text = match guard.session.state() {
                PatchSessionState::Selected { selected_text, .. } => selected_text.clone(),
                _ => return Err(ServiceError::NoPendingSelection),
            };
            let full_content = guard
                .state
                .chain
                .current_content()
                .ok_or(ServiceError::NoDocument)?
                .to_string();

            guard.session.handle_event(PatchEvent::SuggestionRequested {
                instruction: instruction.clone(),
            });
            SuggestionRequest {
                selected_text,
                instruction,
                full_content,
            }
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = provider.suggest(request) => Some(result),
        };

        let mut guard = entry.write().await;
        match outcome {
            None => {
                guard.session.handle_event(PatchEvent::SuggestionFailed {
                    error: "cancelled by caller".to_string(),
                });
                Ok(None)
            }
            Some(Err(e)) => {
                tracing::warn!(%project_id, error = %e, "suggestion generation failed");
                guard.session.handle_event(PatchEvent::SuggestionFailed {
                    error: e.to_string(),
                });
                Err(e.into())
            }
            Some(Ok(suggestion)) => {
                guard.session.handle_event(PatchEvent::SuggestionReceived {
                    suggestion_text: suggestion.suggestion_text.clone(),
                    explanation: suggestion.explanation.clone(),
                    confidence: suggestion.confidence,
                });
                Ok(Some(suggestion))
            }
        }
    }

    /// Discard a pending suggestion without applying it.
    pub async fn discard_suggestion(&self, project_id: Uuid) -> Result<()> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;
        guard.session.handle_event(PatchEvent::SuggestionDiscarded);
        Ok(())
    }

    /// Apply a replacement over the selected span and append the result as
    /// a new version.
    ///
    /// `base_version` is the chain length the caller observed when it read
    /// the content it is patching; if the chain has moved past it the call
    /// fails with `ConcurrencyConflict` and the caller must reload and
    /// retry. Ambiguity (the selected text occurring more than once in the
    /// freshest content) is reported in the outcome but never blocks the
    /// edit, which always lands at the explicit selection offset.
    pub async fn apply_patch(
        &self,
        project_id: Uuid,
        base_version: u64,
        request: &PatchRequest,
        replacement_text: String,
        instruction: Option<String>,
        author: Author,
    ) -> Result<PatchOutcome> {
        let entry = self.entry(project_id).await?;
        let mut guard = entry.write().await;

        let actual = guard.state.chain.len();
        if actual != base_version {
            return Err(ServiceError::ConcurrencyConflict {
                expected: base_version,
                actual,
            });
        }

        let outcome = guard.state.chain.apply_patch(PatchArgs {
            selected_text: request.selected_text.clone(),
            replacement_text,
            selection_start: request.selection_start,
            instruction,
            author,
        })?;

        guard.session.handle_event(PatchEvent::PatchApplied {
            version_number: outcome.version_number,
        });
        self.persist(project_id, &guard.state).await?;
        Ok(outcome)
    }

    /// Current patch-session state, for callers that surface it.
    pub async fn session_state(&self, project_id: Uuid) -> Result<PatchSessionState> {
        let entry = self.entry(project_id).await?;
        let guard = entry.read().await;
        Ok(guard.session.state().clone())
    }

    // ========== Helpers ==========

    fn require_outline<'a>(&self, state: &'a ProjectState) -> Result<&'a Outline> {
        state
            .outline
            .as_ref()
            .ok_or_else(|| DocumentError::Validation("no outline registered".to_string()).into())
    }

    fn require_leaf(&self, state: &ProjectState, key: &SectionKey) -> Result<()> {
        let outline = self.require_outline(state)?;
        if !outline.contains(&key.section_id, &key.subsection_id) {
            return Err(DocumentError::UnknownNode(format!(
                "{}/{}",
                key.section_id, key.subsection_id
            ))
            .into());
        }
        Ok(())
    }
}
