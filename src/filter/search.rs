//! Search matching: literal substring or compiled regex.

use regex::{Regex, RegexBuilder};

/// How the search text is matched against entry content.
#[derive(Clone, Debug)]
pub enum SearchMode {
    /// Substring containment. `needle` is already lowercased when the match
    /// is case-insensitive.
    Literal { needle: String, case_sensitive: bool },

    /// Compiled pattern; case-insensitivity is baked into the regex.
    Pattern(Regex),
}

impl SearchMode {
    /// Build the mode for a search string.
    ///
    /// With `use_regex`, a pattern that fails to compile becomes a literal
    /// search for the same text.
    pub fn new(search: &str, case_sensitive: bool, use_regex: bool) -> Self {
        if use_regex {
            match RegexBuilder::new(search)
                .case_insensitive(!case_sensitive)
                .build()
            {
                Ok(re) => return SearchMode::Pattern(re),
                Err(e) => {
                    tracing::debug!(
                        pattern = search,
                        error = %e,
                        "invalid search pattern, matching literally"
                    );
                }
            }
        }
        Self::literal(search, case_sensitive)
    }

    pub fn literal(search: &str, case_sensitive: bool) -> Self {
        SearchMode::Literal {
            needle: if case_sensitive {
                search.to_string()
            } else {
                search.to_lowercase()
            },
            case_sensitive,
        }
    }

    pub fn matches(&self, content: &str) -> bool {
        match self {
            SearchMode::Literal {
                needle,
                case_sensitive: true,
            } => content.contains(needle.as_str()),
            SearchMode::Literal {
                needle,
                case_sensitive: false,
            } => content.to_lowercase().contains(needle.as_str()),
            SearchMode::Pattern(re) => re.is_match(content),
        }
    }

    /// Whether a regex compiled successfully.
    pub fn is_pattern(&self) -> bool {
        matches!(self, SearchMode::Pattern(_))
    }
}
