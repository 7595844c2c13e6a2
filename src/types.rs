//! Core types for the filter store.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::history::SearchHistory;

/// A single parsed log line, as delivered by the upload backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log category, e.g. `LogNet`.
    #[serde(rename = "type")]
    pub log_type: String,
    /// Line text after the category prefix.
    pub content: String,
}

impl LogEntry {
    pub fn new(log_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            log_type: log_type.into(),
            content: content.into(),
        }
    }
}

/// Aggregate metadata for one log category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogType {
    #[serde(rename = "type")]
    pub log_type: String,
    pub count: usize,
}

impl LogType {
    pub fn new(log_type: impl Into<String>, count: usize) -> Self {
        Self {
            log_type: log_type.into(),
            count,
        }
    }
}

/// Severity detected from an entry's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Display,
    Warning,
    Error,
}

impl LogLevel {
    /// All levels, in display order.
    pub const ALL: [LogLevel; 3] = [LogLevel::Display, LogLevel::Warning, LogLevel::Error];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Display => "Display",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
        }
    }

    /// Label for an optional level; entries without a level render as `""`.
    pub fn label(level: Option<LogLevel>) -> &'static str {
        level.map(LogLevel::as_str).unwrap_or("")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current filter settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Levels to include (empty = all).
    pub levels: HashSet<LogLevel>,

    /// Log types to include (empty = all).
    pub types: HashSet<String>,

    /// Search text (empty = no search).
    pub search: String,

    pub case_sensitive: bool,

    /// Treat `search` as a regular expression.
    pub use_regex: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            levels: LogLevel::ALL.into_iter().collect(),
            types: HashSet::new(),
            search: String::new(),
            case_sensitive: false,
            use_regex: false,
        }
    }
}

impl FilterCriteria {
    /// Shallow-merge a partial update. Fields left as `None` keep their value.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(levels) = update.levels {
            self.levels = levels;
        }
        if let Some(types) = update.types {
            self.types = types;
        }
        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(case_sensitive) = update.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
        if let Some(use_regex) = update.use_regex {
            self.use_regex = use_regex;
        }
    }
}

/// Partial update to [`FilterCriteria`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub levels: Option<HashSet<LogLevel>>,
    pub types: Option<HashSet<String>>,
    pub search: Option<String>,
    pub case_sensitive: Option<bool>,
    pub use_regex: Option<bool>,
}

impl FilterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.levels = Some(levels.into_iter().collect());
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn use_regex(mut self, use_regex: bool) -> Self {
        self.use_regex = Some(use_regex);
        self
    }
}

/// Loading indicator shown while an upload is in flight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub is_loading: bool,
    pub loading_message: Option<String>,
}

/// Everything the viewer knows for one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Name of the uploaded file, once there is one.
    pub current_file: Option<String>,
    pub entries: Vec<LogEntry>,
    pub log_types: Vec<LogType>,
    pub filters: FilterCriteria,
    pub search_history: SearchHistory,
    pub ui: UiState,
}

/// Entry count per detected level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub display: usize,
    pub warning: usize,
    pub error: usize,
}

impl LevelCounts {
    pub fn record(&mut self, level: LogLevel) {
        match level {
            LogLevel::Display => self.display += 1,
            LogLevel::Warning => self.warning += 1,
            LogLevel::Error => self.error += 1,
        }
    }

    pub fn get(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Display => self.display,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
        }
    }

    pub fn total(&self) -> usize {
        self.display + self.warning + self.error
    }
}
