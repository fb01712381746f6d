use serde::{Deserialize, Serialize};

/// Default upper bound for a search term, in characters
pub const DEFAULT_MAX_TERM_LENGTH: usize = 10_000;

/// Tunables applied to every search term before it becomes a LIKE pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Longer terms are truncated to this many characters
    pub max_term_length: usize,
    /// Escape `%`, `_` and `\` so they match literally
    pub escape_wildcards: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
            escape_wildcards: true,
        }
    }
}

impl SearchConfig {
    /// Trim and truncate a raw term. Returns `None` when nothing is left to search for.
    #[must_use]
    pub fn normalize_term<'a>(&self, term: &'a str) -> Option<&'a str> {
        let trimmed = term.trim();
        let end = trimmed
            .char_indices()
            .nth(self.max_term_length)
            .map_or(trimmed.len(), |(idx, _)| idx);
        let normalized = trimmed[..end].trim_end();
        (!normalized.is_empty()).then_some(normalized)
    }
}
