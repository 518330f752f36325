//! Outline registry - the static ordered tree of sections and subsections
//! that defines the canonical document skeleton.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// A terminal outline node. Carries the prompt questions the user answers
/// before content for this subsection can be generated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OutlineLeaf {
    /// Stable path id, e.g. "2.3".
    pub id: String,
    pub title: String,
    /// Declared position among siblings.
    pub order: u32,
    /// Ordered prompt questions; every leaf must carry at least one.
    pub questions: Vec<String>,
}

/// A top-level section owning an ordered list of leaf subsections.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OutlineSection {
    pub id: String,
    pub title: String,
    pub order: u32,
    pub subsections: Vec<OutlineLeaf>,
}

/// The validated, immutable document skeleton for one project.
///
/// Constructed once via [`Outline::register`]; sections and subsections are
/// stored sorted by their declared `order`, so iteration always follows the
/// canonical document order regardless of the order the caller supplied.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Outline {
    sections: Vec<OutlineSection>,
}

impl Outline {
    /// Validate and register an outline tree.
    ///
    /// Fails with [`DocumentError::Validation`] if any node id repeats or
    /// any leaf carries no questions.
    pub fn register(mut sections: Vec<OutlineSection>) -> Result<Self, DocumentError> {
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id.clone()) {
                return Err(DocumentError::Validation(format!(
                    "duplicate outline id: {}",
                    section.id
                )));
            }
            for leaf in &section.subsections {
                if !seen.insert(leaf.id.clone()) {
                    return Err(DocumentError::Validation(format!(
                        "duplicate outline id: {}",
                        leaf.id
                    )));
                }
                if leaf.questions.is_empty() {
                    return Err(DocumentError::Validation(format!(
                        "leaf {} has no prompt questions",
                        leaf.id
                    )));
                }
            }
        }

        sections.sort_by_key(|s| s.order);
        for section in &mut sections {
            section.subsections.sort_by_key(|l| l.order);
        }

        Ok(Self { sections })
    }

    /// Sections in declared order.
    pub fn sections(&self) -> &[OutlineSection] {
        &self.sections
    }

    /// Total number of leaf subsections; the denominator of the
    /// completion metric.
    pub fn leaf_count(&self) -> usize {
        self.sections.iter().map(|s| s.subsections.len()).sum()
    }

    /// Look up a leaf by (section, subsection) id pair.
    pub fn leaf(&self, section_id: &str, subsection_id: &str) -> Option<&OutlineLeaf> {
        self.sections
            .iter()
            .find(|s| s.id == section_id)?
            .subsections
            .iter()
            .find(|l| l.id == subsection_id)
    }

    /// Whether the pair names a leaf of this outline.
    pub fn contains(&self, section_id: &str, subsection_id: &str) -> bool {
        self.leaf(section_id, subsection_id).is_some()
    }
}
