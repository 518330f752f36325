//! Selection-scoped patching - span extraction, occurrence counting, and
//! the argument/outcome types for `VersionChain::apply_patch`.

use serde::{Deserialize, Serialize};

use crate::error::RevisionError;
use crate::version::{Author, ChangedSpan};

/// Count non-overlapping occurrences of `needle` in `content`.
///
/// Pure helper behind the ambiguity advisory. An empty needle is defined
/// to occur zero times.
pub fn count_occurrences(content: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    content.matches(needle).count()
}

/// A user selection over a content snapshot, captured when the patch flow
/// starts. Ephemeral; never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PatchRequest {
    pub selected_text: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

impl PatchRequest {
    /// Extract `snapshot[start..end)` as the selected text. Byte offsets;
    /// out-of-range or non-boundary offsets fail with
    /// `OutOfRangeSelection`.
    pub fn from_selection(
        start: usize,
        end: usize,
        snapshot: &str,
    ) -> Result<Self, RevisionError> {
        if start > end
            || end > snapshot.len()
            || !snapshot.is_char_boundary(start)
            || !snapshot.is_char_boundary(end)
        {
            return Err(RevisionError::OutOfRangeSelection {
                start,
                end,
                content_len: snapshot.len(),
            });
        }
        Ok(Self {
            selected_text: snapshot[start..end].to_string(),
            selection_start: start,
            selection_end: end,
        })
    }
}

/// Everything `apply_patch` needs. The selected text and offset come from
/// the original `PatchRequest`; the replacement comes from the suggestion
/// (or directly from the user).
#[derive(Clone, Debug)]
pub struct PatchArgs {
    pub selected_text: String,
    pub replacement_text: String,
    pub selection_start: usize,
    pub instruction: Option<String>,
    pub author: Author,
}

/// Result of a successful patch. `ambiguous` is advisory only: the patch
/// already landed at the explicit offset.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchOutcome {
    pub version_number: u64,
    pub changed_span: ChangedSpan,
    pub occurrences: usize,
    pub ambiguous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_occurrences() {
        assert_eq!(count_occurrences("foo bar foo", "foo"), 2);
        assert_eq!(count_occurrences("foo bar foo", "baz"), 0);
        assert_eq!(count_occurrences("aaaa", "aa"), 2); // non-overlapping
        assert_eq!(count_occurrences("anything", ""), 0);
    }

    #[test]
    fn test_from_selection_extracts_span() {
        let request = PatchRequest::from_selection(6, 11, "Hello world").unwrap();
        assert_eq!(request.selected_text, "world");
        assert_eq!(request.selection_start, 6);
        assert_eq!(request.selection_end, 11);
    }

    #[test]
    fn test_from_selection_empty_span() {
        let request = PatchRequest::from_selection(5, 5, "Hello world").unwrap();
        assert_eq!(request.selected_text, "");
    }

    #[test]
    fn test_from_selection_out_of_range() {
        assert!(PatchRequest::from_selection(6, 20, "Hello world").is_err());
        assert!(PatchRequest::from_selection(8, 6, "Hello world").is_err());
    }

    #[test]
    fn test_from_selection_rejects_char_boundary_split() {
        // "é" is two bytes; offset 1 splits it.
        assert!(PatchRequest::from_selection(0, 1, "été").is_err());
    }
}
