use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Zero-based question index → drafted answer text.
///
/// Built incrementally by the numbered-response parser. Indices the model did
/// not answer are simply absent; readers use [`AnswerSet::answer_or_empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<usize, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an answer, replacing any earlier answer at the same index.
    pub fn insert(&mut self, index: usize, answer: impl Into<String>) {
        self.answers.insert(index, answer.into());
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answer_or_empty(&self, index: usize) -> &str {
        self.get(index).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.answers.keys().copied()
    }
}
