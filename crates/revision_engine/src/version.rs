//! Version snapshots - immutable full-text captures of the document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a version.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Human,
    Assistant,
}

/// Byte span `[start, end)` in the *new* content that a patch replaced.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangedSpan {
    pub start: usize,
    pub end: usize,
}

/// Optional metadata attached when a version is appended.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionMeta {
    pub instruction: Option<String>,
    pub changed_span: Option<ChangedSpan>,
}

/// One immutable snapshot in the chain. Numbers are 1-based, strictly
/// increasing, and contiguous; a version is never mutated, reordered, or
/// removed once appended.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Version {
    pub number: u64,
    pub content: String,
    pub author: Author,
    pub instruction: Option<String>,
    pub changed_span: Option<ChangedSpan>,
    pub created_at: DateTime<Utc>,
}
