//! Answer store - question/answer pairs collected per leaf subsection.
//!
//! Answers are only ever consumed as input to the external section content
//! generator; they never appear in the assembled document themselves.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sections::SectionKey;

/// One answered prompt question.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Holds the answered questions for each leaf subsection. Re-answering a
/// question overwrites the previous answer for that question.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerStore {
    #[serde(with = "crate::sections::key_map")]
    answers: HashMap<SectionKey, Vec<QaPair>>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer for a leaf, overwriting any prior answer to the
    /// same question.
    pub fn record(&mut self, key: SectionKey, question: String, answer: String) {
        let pairs = self.answers.entry(key).or_default();
        if let Some(existing) = pairs.iter_mut().find(|p| p.question == question) {
            existing.answer = answer;
        } else {
            pairs.push(QaPair { question, answer });
        }
    }

    /// Answered pairs for a leaf, in the order they were first answered.
    pub fn answers_for(&self, key: &SectionKey) -> &[QaPair] {
        self.answers.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_answered(&self, key: &SectionKey) -> bool {
        !self.answers_for(key).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read_back() {
        let mut store = AnswerStore::new();
        let key = SectionKey::new("1", "1.1");

        store.record(key.clone(), "Who?".to_string(), "Us".to_string());
        store.record(key.clone(), "Why?".to_string(), "Because".to_string());

        let pairs = store.answers_for(&key);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "Who?");
        assert!(store.is_answered(&key));
    }

    #[test]
    fn test_reanswer_overwrites() {
        let mut store = AnswerStore::new();
        let key = SectionKey::new("1", "1.1");

        store.record(key.clone(), "Who?".to_string(), "Us".to_string());
        store.record(key.clone(), "Who?".to_string(), "Them".to_string());

        let pairs = store.answers_for(&key);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].answer, "Them");
    }

    #[test]
    fn test_unanswered_leaf_is_empty() {
        let store = AnswerStore::new();
        let key = SectionKey::new("9", "9.9");
        assert!(store.answers_for(&key).is_empty());
        assert!(!store.is_answered(&key));
    }
}
