//! Patch session transitions - event-driven state machine logic.

use super::events::PatchEvent;
use super::states::PatchSessionState;

/// Represents a state transition result.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: PatchSessionState,
    /// The state after the transition.
    pub to: PatchSessionState,
    /// The event that triggered the transition.
    pub event: PatchEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine for one document's patch session.
#[derive(Debug, Clone)]
pub struct PatchStateMachine {
    current_state: PatchSessionState,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    max_history: usize,
}

impl Default for PatchStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchStateMachine {
    /// Create a new state machine in Idle state.
    pub fn new() -> Self {
        Self {
            current_state: PatchSessionState::Idle,
            history: Vec::new(),
            max_history: 50,
        }
    }

    pub fn state(&self) -> &PatchSessionState {
        &self.current_state
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Handle an event and transition to a new state.
    pub fn handle_event(&mut self, event: PatchEvent) -> StateTransition {
        let old_state = self.current_state.clone();
        let new_state = Self::compute_next_state(&old_state, &event);
        let changed = old_state != new_state;

        tracing::debug!(
            from = ?old_state,
            to = ?new_state,
            event = event.name(),
            "patch session transition"
        );

        self.current_state = new_state.clone();

        let transition = StateTransition {
            from: old_state,
            to: new_state,
            event,
            changed,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        transition
    }

    fn compute_next_state(state: &PatchSessionState, event: &PatchEvent) -> PatchSessionState {
        use PatchEvent::*;
        use PatchSessionState::*;

        match (state, event) {
            // A fresh selection replaces whatever selection existed, but is
            // ignored while a request is in flight or pending review.
            (
                Idle | Selected { .. },
                SpanSelected {
                    selection_start,
                    selection_end,
                    selected_text,
                },
            ) => Selected {
                selection_start: *selection_start,
                selection_end: *selection_end,
                selected_text: selected_text.clone(),
            },

            (
                Selected {
                    selection_start,
                    selected_text,
                    ..
                },
                SuggestionRequested { instruction },
            ) => AwaitingSuggestion {
                selected_text: selected_text.clone(),
                selection_start: *selection_start,
                instruction: instruction.clone(),
            },

            (
                AwaitingSuggestion {
                    selected_text,
                    selection_start,
                    instruction,
                },
                SuggestionReceived {
                    suggestion_text,
                    explanation,
                    confidence,
                },
            ) => SuggestionReady {
                selected_text: selected_text.clone(),
                selection_start: *selection_start,
                instruction: instruction.clone(),
                suggestion_text: suggestion_text.clone(),
                explanation: explanation.clone(),
                confidence: *confidence,
            },

            // Failure or cancellation surfaces to the caller and leaves the
            // document exactly as it was.
            (AwaitingSuggestion { .. }, SuggestionFailed { .. }) => Idle,

            (SuggestionReady { .. }, PatchApplied { .. }) => Idle,
            (SuggestionReady { .. }, SuggestionDiscarded) => Idle,

            (Selected { .. }, SelectionCleared) => Idle,

            // ========== Default: No transition ==========
            _ => state.clone(),
        }
    }

    /// Check if an event would change the state without executing it.
    pub fn can_transition(&self, event: &PatchEvent) -> bool {
        Self::compute_next_state(&self.current_state, event) != self.current_state
    }

    /// Reset to Idle state.
    pub fn reset(&mut self) {
        self.current_state = PatchSessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_world() -> PatchEvent {
        PatchEvent::SpanSelected {
            selection_start: 6,
            selection_end: 11,
            selected_text: "world".to_string(),
        }
    }

    #[test]
    fn test_basic_flow() {
        let mut sm = PatchStateMachine::new();
        assert_eq!(sm.state(), &PatchSessionState::Idle);

        let t1 = sm.handle_event(select_world());
        assert!(t1.changed);
        assert!(matches!(sm.state(), PatchSessionState::Selected { .. }));

        let t2 = sm.handle_event(PatchEvent::SuggestionRequested {
            instruction: "make it a planet".to_string(),
        });
        assert!(t2.changed);
        assert!(sm.state().is_suspended());

        sm.handle_event(PatchEvent::SuggestionReceived {
            suggestion_text: "Earth".to_string(),
            explanation: None,
            confidence: Some(0.9),
        });
        assert!(matches!(
            sm.state(),
            PatchSessionState::SuggestionReady { .. }
        ));

        let applied = sm.handle_event(PatchEvent::PatchApplied { version_number: 2 });
        assert!(applied.changed);
        assert_eq!(sm.state(), &PatchSessionState::Idle);
    }

    #[test]
    fn test_failed_suggestion_returns_to_idle() {
        let mut sm = PatchStateMachine::new();
        sm.handle_event(select_world());
        sm.handle_event(PatchEvent::SuggestionRequested {
            instruction: "anything".to_string(),
        });

        let t = sm.handle_event(PatchEvent::SuggestionFailed {
            error: "adapter timed out".to_string(),
        });
        assert!(t.changed);
        assert_eq!(sm.state(), &PatchSessionState::Idle);
    }

    #[test]
    fn test_discard_returns_to_idle() {
        let mut sm = PatchStateMachine::new();
        sm.handle_event(select_world());
        sm.handle_event(PatchEvent::SuggestionRequested {
            instruction: "anything".to_string(),
        });
        sm.handle_event(PatchEvent::SuggestionReceived {
            suggestion_text: "Earth".to_string(),
            explanation: None,
            confidence: None,
        });

        sm.handle_event(PatchEvent::SuggestionDiscarded);
        assert_eq!(sm.state(), &PatchSessionState::Idle);
    }

    #[test]
    fn test_selection_ignored_while_awaiting() {
        let mut sm = PatchStateMachine::new();
        sm.handle_event(select_world());
        sm.handle_event(PatchEvent::SuggestionRequested {
            instruction: "anything".to_string(),
        });

        let t = sm.handle_event(select_world());
        assert!(!t.changed);
        assert!(sm.state().is_suspended());
    }

    #[test]
    fn test_reselection_replaces_selection() {
        let mut sm = PatchStateMachine::new();
        sm.handle_event(select_world());
        let t = sm.handle_event(PatchEvent::SpanSelected {
            selection_start: 0,
            selection_end: 5,
            selected_text: "Hello".to_string(),
        });
        assert!(t.changed);
        match sm.state() {
            PatchSessionState::Selected { selected_text, .. } => {
                assert_eq!(selected_text, "Hello")
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn test_history_tracking() {
        let mut sm = PatchStateMachine::new();
        sm.handle_event(select_world());
        sm.handle_event(PatchEvent::SelectionCleared);
        assert_eq!(sm.history().len(), 2);
    }
}
