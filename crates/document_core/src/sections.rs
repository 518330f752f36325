//! Section content store - the single current approved/draft content string
//! per subsection, keyed by a proper composite key rather than an ad hoc
//! concatenated string.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outline::Outline;

/// Composite key identifying one leaf subsection.
#[derive(Serialize, Deserialize, Clone, Debug, Hash, PartialEq, Eq)]
pub struct SectionKey {
    pub section_id: String,
    pub subsection_id: String,
}

impl SectionKey {
    pub fn new(section_id: impl Into<String>, subsection_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            subsection_id: subsection_id.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Draft,
    Approved,
}

/// Current content for one subsection. Immutable snapshot; upserts replace
/// the whole record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SectionRecord {
    pub content: String,
    pub status: SectionStatus,
    pub updated_at: DateTime<Utc>,
}

/// Completion metric over an outline.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub completed_count: usize,
    pub total_count: usize,
    pub percentage: u32,
}

/// Per-project map of saved subsection content.
///
/// Upsert semantics: a new save for the same key replaces the prior record.
/// Records are never deleted, so the distinct-key count only grows.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionStore {
    #[serde(with = "key_map")]
    records: HashMap<SectionKey, SectionRecord>,
}

/// Serde helper: JSON map keys must be strings, so struct-keyed maps are
/// persisted as a sequence of `(key, value)` pairs instead.
pub(crate) mod key_map {
    use std::collections::HashMap;

    use serde::de::{Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};

    use super::SectionKey;

    pub fn serialize<V, S>(map: &HashMap<SectionKey, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<HashMap<SectionKey, V>, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(SectionKey, V)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite-or-insert content for a key. Returns the number of
    /// distinct keys saved so far.
    pub fn upsert(&mut self, key: SectionKey, content: String, status: SectionStatus) -> usize {
        tracing::debug!(
            section_id = %key.section_id,
            subsection_id = %key.subsection_id,
            status = ?status,
            "upserting section record"
        );
        self.records.insert(
            key,
            SectionRecord {
                content,
                status,
                updated_at: Utc::now(),
            },
        );
        self.records.len()
    }

    /// Flip an existing record to `Approved`. Returns false when the key
    /// has no record yet.
    pub fn approve(&mut self, key: &SectionKey) -> bool {
        match self.records.get_mut(key) {
            Some(record) => {
                record.status = SectionStatus::Approved;
                record.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &SectionKey) -> Option<&SectionRecord> {
        self.records.get(key)
    }

    /// Record for a key only if it has been approved.
    pub fn approved(&self, key: &SectionKey) -> Option<&SectionRecord> {
        self.records
            .get(key)
            .filter(|r| r.status == SectionStatus::Approved)
    }

    pub fn saved_key_count(&self) -> usize {
        self.records.len()
    }

    /// Completion over the given outline: distinct saved keys (draft or
    /// approved) out of total leaves. An empty outline yields 0%.
    pub fn completion(&self, outline: &Outline) -> Completion {
        let total_count = outline.leaf_count();
        let completed_count = self
            .records
            .keys()
            .filter(|k| outline.contains(&k.section_id, &k.subsection_id))
            .count();
        let percentage = if total_count == 0 {
            0
        } else {
            ((completed_count as f64 / total_count as f64) * 100.0).round() as u32
        };
        Completion {
            completed_count,
            total_count,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{OutlineLeaf, OutlineSection};

    fn outline_with_leaves(ids: &[(&str, &[&str])]) -> Outline {
        let sections = ids
            .iter()
            .enumerate()
            .map(|(i, (sec, subs))| OutlineSection {
                id: sec.to_string(),
                title: format!("Section {sec}"),
                order: i as u32 + 1,
                subsections: subs
                    .iter()
                    .enumerate()
                    .map(|(j, sub)| OutlineLeaf {
                        id: sub.to_string(),
                        title: format!("Subsection {sub}"),
                        order: j as u32 + 1,
                        questions: vec!["Q?".to_string()],
                    })
                    .collect(),
            })
            .collect();
        Outline::register(sections).unwrap()
    }

    #[test]
    fn test_upsert_replaces_without_growing() {
        let mut store = SectionStore::new();
        let key = SectionKey::new("1", "1.1");

        assert_eq!(
            store.upsert(key.clone(), "v1".to_string(), SectionStatus::Draft),
            1
        );
        assert_eq!(
            store.upsert(key.clone(), "v2".to_string(), SectionStatus::Approved),
            1
        );
        assert_eq!(store.get(&key).unwrap().content, "v2");
    }

    #[test]
    fn test_approve_flips_status() {
        let mut store = SectionStore::new();
        let key = SectionKey::new("1", "1.1");
        store.upsert(key.clone(), "draft text".to_string(), SectionStatus::Draft);

        assert!(store.approved(&key).is_none());
        assert!(store.approve(&key));
        assert!(store.approved(&key).is_some());

        assert!(!store.approve(&SectionKey::new("9", "9.9")));
    }

    #[test]
    fn test_completion_three_of_four() {
        let outline = outline_with_leaves(&[("1", &["1.1", "1.2"]), ("2", &["2.1", "2.2"])]);
        let mut store = SectionStore::new();
        for key in ["1.1", "1.2", "2.1"] {
            let section = &key[..1];
            store.upsert(
                SectionKey::new(section, key),
                "text".to_string(),
                SectionStatus::Approved,
            );
        }

        let completion = store.completion(&outline);
        assert_eq!(completion.completed_count, 3);
        assert_eq!(completion.total_count, 4);
        assert_eq!(completion.percentage, 75);
    }

    #[test]
    fn test_completion_empty_outline_is_zero() {
        let outline = Outline::register(vec![]).unwrap();
        let store = SectionStore::new();
        let completion = store.completion(&outline);
        assert_eq!(completion.total_count, 0);
        assert_eq!(completion.percentage, 0);
    }
}
