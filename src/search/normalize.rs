//! Text normalization for matching
//!
//! Every comparison in the search pipeline happens between normalized forms,
//! so both the query and each candidate name go through [`normalize_text`].

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block (U+0300..=U+036F)
fn is_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Normalize text for matching
/// - lower-case
/// - canonical decomposition (NFD), then drop combining diacritics
/// - trim surrounding whitespace
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .collect::<String>()
        .trim()
        .to_string()
}
