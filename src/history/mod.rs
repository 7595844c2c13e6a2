//! Search history with durable persistence.
//!
//! History is a most-recent-first list of distinct search terms, capped at a
//! fixed length. It is stored as a JSON array of strings under one key of a
//! [`KeyValueStore`]. Storage problems never reach the caller: they are logged
//! and the in-memory history carries on.

mod storage;

pub use storage::{FileStorage, KeyValueStore, MemoryStorage};

use crate::error::Result;

/// Default number of remembered search terms.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Most-recent-first list of distinct search terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHistory {
    terms: Vec<String>,
    limit: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl SearchHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            terms: Vec::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    /// Build from stored terms, dropping blanks and duplicates and applying
    /// the cap.
    pub fn from_terms(terms: impl IntoIterator<Item = String>, limit: usize) -> Self {
        let mut history = Self::with_limit(limit);
        for term in terms {
            let term = term.trim();
            if !term.is_empty() && !history.contains(term) && history.terms.len() < limit {
                history.terms.push(term.to_string());
            }
        }
        history
    }

    /// Record a search term. Returns false if the term was blank.
    pub fn push(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }

        self.terms.retain(|t| t != term);
        self.terms.insert(0, term.to_string());
        self.terms.truncate(self.limit);
        true
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Load history from `storage`, falling back to empty on any failure.
    pub fn load(storage: &dyn KeyValueStore, key: &str, limit: usize) -> Self {
        match Self::try_load(storage, key, limit) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to load search history");
                Self::with_limit(limit)
            }
        }
    }

    fn try_load(storage: &dyn KeyValueStore, key: &str, limit: usize) -> Result<Self> {
        let Some(content) = storage.get(key)? else {
            return Ok(Self::with_limit(limit));
        };
        let terms: Vec<String> = serde_json::from_str(&content)?;
        Ok(Self::from_terms(terms, limit))
    }

    /// Write history to `storage`. Failures are logged, not returned.
    pub fn persist(&self, storage: &dyn KeyValueStore, key: &str) {
        if let Err(e) = self.try_persist(storage, key) {
            tracing::warn!(key, error = %e, "failed to save search history");
        }
    }

    fn try_persist(&self, storage: &dyn KeyValueStore, key: &str) -> Result<()> {
        let content = serde_json::to_string(&self.terms)?;
        storage.set(key, &content)
    }
}
