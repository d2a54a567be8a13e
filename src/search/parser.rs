//! Query Parser & Preprocessor
//!
//! Classifies a raw query into the ranking path it takes and precomputes the
//! normalized form and word list the scorer needs.

use super::normalize::normalize_text;

/// Which ranking path a query takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Blank query: every record passes through unranked
    Empty,
    /// One character: plain containment filter, no scoring
    SingleChar,
    /// Full scoring pass
    Terms,
}

/// Parsed and processed search query
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// Original unmodified query
    pub raw: String,
    /// Query with surrounding whitespace removed
    pub trimmed: String,
    /// Normalized form of the trimmed query
    pub normalized: String,
    /// Whitespace-separated words of the normalized query
    pub words: Vec<String>,
    pub kind: QueryKind,
}

impl ParsedQuery {
    /// Parse a search query into its components
    pub fn parse(query: &str) -> Self {
        let trimmed = query.trim().to_string();
        let normalized = normalize_text(&trimmed);
        let words: Vec<String> = normalized
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let kind = if trimmed.is_empty() {
            QueryKind::Empty
        } else if trimmed.chars().count() == 1 {
            QueryKind::SingleChar
        } else if words.is_empty() {
            // e.g. a lone combining mark: nothing left after normalization
            QueryKind::Empty
        } else {
            QueryKind::Terms
        };

        Self {
            raw: query.to_string(),
            trimmed,
            normalized,
            words,
            kind,
        }
    }

    /// Length of the normalized query in characters
    pub fn normalized_len(&self) -> usize {
        self.normalized.chars().count()
    }
}
