//! User memo recovery from previously generated documents.
//!
//! # Responsibility
//! - Recover per-task memo regions from prior document text.
//! - Hold the recovered memos in an index keyed by task id.
//!
//! # Invariants
//! - Memo text is stored verbatim, trailing newlines and whitespace included.
//! - Core never authors memo text; it only moves it between document versions.

mod extract;

pub use extract::{extract_memos, load_memos, memo_marker};

use serde::Serialize;
use std::collections::BTreeMap;

/// Memo text recovered from one document, keyed by task id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MemoIndex {
    memos: BTreeMap<String, String>,
}

impl MemoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `memo` for `task_id`, replacing an earlier entry.
    pub fn insert(&mut self, task_id: impl Into<String>, memo: impl Into<String>) {
        self.memos.insert(task_id.into(), memo.into());
    }

    /// Returns the raw memo for `task_id`, possibly empty.
    pub fn get(&self, task_id: &str) -> Option<&str> {
        self.memos.get(task_id).map(String::as_str)
    }

    /// Returns the memo for `task_id` only when it has content to re-inject.
    pub fn preserved(&self, task_id: &str) -> Option<&str> {
        self.get(task_id).filter(|memo| !memo.is_empty())
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    /// Iterates entries in task id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.memos
            .iter()
            .map(|(id, memo)| (id.as_str(), memo.as_str()))
    }
}
