//! Severity detection from entry content.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::LogLevel;

/// Keyword patterns in priority order. A line mentioning both `Warning` and
/// `Error` is a warning.
static LEVEL_PATTERNS: LazyLock<[(LogLevel, Regex); 3]> = LazyLock::new(|| {
    [
        (LogLevel::Warning, keyword(r"(?i)(?-u:\b)Warning(?-u:\b)")),
        (LogLevel::Error, keyword(r"(?i)(?-u:\b)Error(?-u:\b)")),
        (LogLevel::Display, keyword(r"(?i)(?-u:\b)Display(?-u:\b)")),
    ]
});

fn keyword(pattern: &str) -> Regex {
    Regex::new(pattern).expect("level keyword pattern is valid")
}

/// Detect the level of a log line.
///
/// Keywords must appear as whole words, so `ErrorHandler` has no level. Word
/// characters are ASCII only: a keyword next to `é` still counts.
pub fn detect_level(content: &str) -> Option<LogLevel> {
    LEVEL_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(content))
        .map(|(level, _)| *level)
}
