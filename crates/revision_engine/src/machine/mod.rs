//! Patch-session state machine.
//!
//! Tracks one user's edit flow over the current document: select a span,
//! request a suggestion, accept or discard it.

pub mod events;
pub mod states;
pub mod transitions;

pub use events::PatchEvent;
pub use states::PatchSessionState;
pub use transitions::{PatchStateMachine, StateTransition};
