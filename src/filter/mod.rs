//! Filter pipeline for log entries.
//!
//! An entry is checked against three predicates in a fixed order, stopping
//! at the first that rejects it:
//! - Type: membership in the selected log types
//! - Level: the level detected from the content
//! - Search: substring or regex match on the content
//!
//! An empty constraint admits everything for that predicate.

mod level;
mod search;

pub use level::detect_level;
pub use search::SearchMode;

use std::collections::HashSet;

use crate::types::{FilterCriteria, LogEntry, LogLevel};

/// Filter criteria prepared for evaluation against many entries.
#[derive(Clone, Debug)]
pub struct CompiledFilter<'a> {
    /// Log types to include (empty = all).
    types: &'a HashSet<String>,

    /// Levels to include (empty = all).
    levels: &'a HashSet<LogLevel>,

    /// Search matcher (None = no search).
    search: Option<SearchMode>,
}

impl<'a> CompiledFilter<'a> {
    /// Compile criteria. Any regex is built here, once.
    pub fn new(criteria: &'a FilterCriteria) -> Self {
        let search = if criteria.search.is_empty() {
            None
        } else {
            Some(SearchMode::new(
                &criteria.search,
                criteria.case_sensitive,
                criteria.use_regex,
            ))
        };

        Self {
            types: &criteria.types,
            levels: &criteria.levels,
            search,
        }
    }

    /// Check if a log entry passes every active predicate.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if !self.types.is_empty() && !self.types.contains(&entry.log_type) {
            return false;
        }

        if !self.levels.is_empty() {
            match detect_level(&entry.content) {
                Some(level) if self.levels.contains(&level) => {}
                _ => return false,
            }
        }

        match &self.search {
            Some(mode) => mode.matches(&entry.content),
            None => true,
        }
    }

    /// Clone out the entries that pass, preserving order.
    pub fn apply(&self, entries: &[LogEntry]) -> Vec<LogEntry> {
        entries
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }

    /// Borrowing variant of [`apply`](Self::apply).
    pub fn iter<'e>(
        &'e self,
        entries: &'e [LogEntry],
    ) -> impl Iterator<Item = &'e LogEntry> + 'e {
        entries.iter().filter(move |e| self.matches(e))
    }

    /// Check if the filter admits every entry.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.levels.is_empty() && self.search.is_none()
    }
}
