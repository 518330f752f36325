//! Document assembler - deterministically merges approved section content,
//! in outline order, into one document string.

use crate::outline::Outline;
use crate::sections::{SectionKey, SectionStore};

/// Assemble the current full document text.
///
/// Walks the outline strictly in its declared order (sections, then
/// subsections) and emits a heading plus the stored content for every
/// subsection with an *approved* record. Policy: subsections without an
/// approved record are omitted entirely, as is a section heading with no
/// approved subsections beneath it; drafts are never emitted.
///
/// Pure function of its inputs: with an unchanged outline and store the
/// output is byte-identical, independent of the order sections were saved.
pub fn assemble(outline: &Outline, store: &SectionStore) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for section in outline.sections() {
        let mut section_blocks: Vec<String> = Vec::new();
        for leaf in &section.subsections {
            let key = SectionKey::new(section.id.clone(), leaf.id.clone());
            if let Some(record) = store.approved(&key) {
                section_blocks.push(format!(
                    "## {} {}\n\n{}",
                    leaf.id,
                    leaf.title,
                    record.content.trim_end()
                ));
            }
        }
        if !section_blocks.is_empty() {
            blocks.push(format!("# {} {}", section.id, section.title));
            blocks.extend(section_blocks);
        }
    }

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{OutlineLeaf, OutlineSection};
    use crate::sections::SectionStatus;

    fn two_section_outline() -> Outline {
        Outline::register(vec![
            OutlineSection {
                id: "1".to_string(),
                title: "Introduction".to_string(),
                order: 1,
                subsections: vec![
                    OutlineLeaf {
                        id: "1.1".to_string(),
                        title: "Purpose".to_string(),
                        order: 1,
                        questions: vec!["Q?".to_string()],
                    },
                    OutlineLeaf {
                        id: "1.2".to_string(),
                        title: "Scope".to_string(),
                        order: 2,
                        questions: vec!["Q?".to_string()],
                    },
                ],
            },
            OutlineSection {
                id: "2".to_string(),
                title: "Requirements".to_string(),
                order: 2,
                subsections: vec![OutlineLeaf {
                    id: "2.1".to_string(),
                    title: "Functional".to_string(),
                    order: 1,
                    questions: vec!["Q?".to_string()],
                }],
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_assemble_follows_outline_order_not_save_order() {
        let outline = two_section_outline();
        let mut store = SectionStore::new();

        // Saved out of order on purpose.
        store.upsert(
            SectionKey::new("2", "2.1"),
            "Functional requirements.".to_string(),
            SectionStatus::Approved,
        );
        store.upsert(
            SectionKey::new("1", "1.1"),
            "Why this document exists.".to_string(),
            SectionStatus::Approved,
        );

        let text = assemble(&outline, &store);
        let first = text.find("Why this document exists.").unwrap();
        let second = text.find("Functional requirements.").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let outline = two_section_outline();
        let mut store = SectionStore::new();
        store.upsert(
            SectionKey::new("1", "1.2"),
            "In scope: everything.".to_string(),
            SectionStatus::Approved,
        );

        assert_eq!(assemble(&outline, &store), assemble(&outline, &store));
    }

    #[test]
    fn test_assemble_omits_pending_and_draft() {
        let outline = two_section_outline();
        let mut store = SectionStore::new();
        store.upsert(
            SectionKey::new("1", "1.1"),
            "Approved text.".to_string(),
            SectionStatus::Approved,
        );
        store.upsert(
            SectionKey::new("1", "1.2"),
            "Draft text.".to_string(),
            SectionStatus::Draft,
        );

        let text = assemble(&outline, &store);
        assert!(text.contains("Approved text."));
        assert!(!text.contains("Draft text."));
        // Section 2 has nothing approved, so its heading is omitted too.
        assert!(!text.contains("# 2 Requirements"));
    }

    #[test]
    fn test_assemble_empty_store_is_empty() {
        let outline = two_section_outline();
        let store = SectionStore::new();
        assert_eq!(assemble(&outline, &store), "");
    }
}
