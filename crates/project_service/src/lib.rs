//! # Project Service
//!
//! Orchestrates the document authoring engine for one project at a time:
//! outline registration, answer collection, section generation and
//! approval, document assembly, and the versioned patch flow. All mutating
//! operations on a project are serialized behind a per-project lock;
//! different projects are fully independent.

pub mod error;
pub mod service;
pub mod state;
pub mod storage;

// Re-exports
pub use error::ServiceError;
pub use service::{ProjectService, VersionSummary};
pub use state::ProjectState;
pub use storage::{FileProjectStorage, ProjectStorage};

pub type Result<T> = std::result::Result<T, ServiceError>;
