//! Version chain - the append-only, strictly ordered sequence of document
//! snapshots plus the current-view pointer used for undo and history
//! browsing.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::RevisionError;
use crate::patch::{count_occurrences, PatchArgs, PatchOutcome};
use crate::version::{Author, ChangedSpan, Version, VersionMeta};

/// Owns the ordered list of versions for one document.
///
/// The chain only ever grows, one version at a time, at the tail. The
/// pointer is a pure view cursor: moving it never creates, deletes, or
/// reorders versions, and a new edit made while viewing an older version
/// still appends after the current tail. History is linear, never
/// branching.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionChain {
    versions: Vec<Version>,
    /// 1-based view pointer; 0 only while the chain is empty.
    current_pointer: u64,
}

impl VersionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of versions in the chain.
    pub fn len(&self) -> u64 {
        self.versions.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// The view pointer (1..=len; 0 while empty).
    pub fn current_pointer(&self) -> u64 {
        self.current_pointer
    }

    /// All versions, oldest first.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Version `k` (1-based).
    pub fn get(&self, k: u64) -> Result<&Version, RevisionError> {
        if k == 0 || k > self.len() {
            return Err(RevisionError::VersionNotFound(k, self.len()));
        }
        Ok(&self.versions[(k - 1) as usize])
    }

    /// The version the pointer currently views.
    pub fn current_version(&self) -> Option<&Version> {
        if self.current_pointer == 0 {
            None
        } else {
            Some(&self.versions[(self.current_pointer - 1) as usize])
        }
    }

    pub fn current_content(&self) -> Option<&str> {
        self.current_version().map(|v| v.content.as_str())
    }

    /// The newest version regardless of where the pointer is.
    pub fn tip(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Append version `len + 1` and move the pointer to it.
    pub fn append_version(&mut self, content: String, author: Author, meta: VersionMeta) -> u64 {
        let number = self.len() + 1;
        tracing::debug!(number, ?author, "appending version");
        self.versions.push(Version {
            number,
            content,
            author,
            instruction: meta.instruction,
            changed_span: meta.changed_span,
            created_at: Utc::now(),
        });
        self.current_pointer = number;
        number
    }

    /// Move the view pointer to version `k` without mutating the chain.
    /// Reading content afterwards returns exactly `versions[k].content`.
    pub fn select_version(&mut self, k: u64) -> Result<&Version, RevisionError> {
        if k == 0 || k > self.len() {
            return Err(RevisionError::VersionNotFound(k, self.len()));
        }
        self.current_pointer = k;
        Ok(&self.versions[(k - 1) as usize])
    }

    /// Apply a selection-scoped patch against the freshest (tip) content
    /// and append the result as a new version.
    ///
    /// Occurrences of the selected text are recounted against the tip, not
    /// whatever snapshot the suggestion was requested from; more than one
    /// occurrence is a non-fatal advisory carried in the outcome, and the
    /// edit still lands at the explicit `selection_start` offset. Offsets
    /// outside the content (or off a char boundary) fail with
    /// `OutOfRangeSelection` and apply nothing.
    pub fn apply_patch(&mut self, args: PatchArgs) -> Result<PatchOutcome, RevisionError> {
        let tip = self.tip().ok_or(RevisionError::EmptyChain)?;
        let content = tip.content.clone();

        let occurrences = count_occurrences(&content, &args.selected_text);

        let start = args.selection_start;
        let end = start + args.selected_text.len();
        if end > content.len() || !content.is_char_boundary(start) || !content.is_char_boundary(end)
        {
            return Err(RevisionError::OutOfRangeSelection {
                start,
                end,
                content_len: content.len(),
            });
        }

        if occurrences > 1 {
            tracing::warn!(
                occurrences,
                selection_start = start,
                "selected text is ambiguous; applying at the explicit offset"
            );
        }

        let mut next = String::with_capacity(
            content.len() - args.selected_text.len() + args.replacement_text.len(),
        );
        next.push_str(&content[..start]);
        next.push_str(&args.replacement_text);
        next.push_str(&content[end..]);

        let changed_span = ChangedSpan {
            start,
            end: start + args.replacement_text.len(),
        };
        let number = self.append_version(
            next,
            args.author,
            VersionMeta {
                instruction: args.instruction,
                changed_span: Some(changed_span),
            },
        );

        Ok(PatchOutcome {
            version_number: number,
            changed_span,
            occurrences,
            ambiguous: occurrences > 1,
        })
    }

    /// Verify the invariants a stored chain must uphold: 1-based contiguous
    /// numbering and an in-range pointer. Violations are unrecoverable and
    /// must abort the load rather than be repaired.
    pub fn validate(&self) -> Result<(), RevisionError> {
        for (idx, version) in self.versions.iter().enumerate() {
            let expected = idx as u64 + 1;
            if version.number != expected {
                return Err(RevisionError::ChainIntegrity(format!(
                    "expected version {expected}, found {}",
                    version.number
                )));
            }
        }
        let valid_pointer = if self.versions.is_empty() {
            self.current_pointer == 0
        } else {
            (1..=self.len()).contains(&self.current_pointer)
        };
        if !valid_pointer {
            return Err(RevisionError::ChainIntegrity(format!(
                "pointer {} out of range for {} versions",
                self.current_pointer,
                self.len()
            )));
        }
        Ok(())
    }
}
