//! Tiered fuzzy matching
//!
//! Cheap, specific checks run first (exact, substring, prefix); the
//! edit-distance tiers only run when those fail. Each tier reports the
//! similarity it assigns so the ranking engine can grade the match.

use super::distance::similarity_chars;
use super::normalize::normalize_text;

/// Threshold used when callers do not pick one
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Patterns longer than this skip the window scan
pub const WINDOW_SCAN_MAX_PATTERN: usize = 8;

/// Highest start offset visited by the window scan
pub const WINDOW_SCAN_MAX_OFFSET: usize = 50;

/// Window similarity that stops the scan early
const WINDOW_SCAN_GOOD_ENOUGH: f64 = 0.9;

const SUBSTRING_SIMILARITY: f64 = 0.95;
const PREFIX_SIMILARITY: f64 = 0.9;
const WORDS_FACTOR: f64 = 0.8;
const WINDOW_FACTOR: f64 = 0.7;

/// Which tier produced the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Normalized strings are equal
    Exact,
    /// Pattern occurs verbatim inside the text
    Substring,
    /// Text starts with the pattern
    Prefix,
    /// Whole-string similarity cleared the threshold
    Whole,
    /// Every pattern word found a similar text word
    Words,
    /// Some short window of the text is similar to the pattern
    Window,
    /// No tier matched
    None,
}

/// Match result with similarity and the tier that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch {
    pub matched: bool,
    /// Similarity in [0, 1]; 0 when not matched
    pub similarity: f64,
    pub tier: MatchTier,
}

impl FuzzyMatch {
    fn hit(similarity: f64, tier: MatchTier) -> Self {
        Self {
            matched: true,
            similarity,
            tier,
        }
    }

    fn miss() -> Self {
        Self {
            matched: false,
            similarity: 0.0,
            tier: MatchTier::None,
        }
    }
}

/// Match `pattern` against `text` after normalizing both
pub fn fuzzy_match(text: &str, pattern: &str, threshold: f64) -> FuzzyMatch {
    let text = normalize_text(text);
    let pattern = normalize_text(pattern);
    fuzzy_match_normalized(&text, &pattern, threshold)
}

/// Same as [`fuzzy_match`] for inputs that are already normalized
pub(crate) fn fuzzy_match_normalized(text: &str, pattern: &str, threshold: f64) -> FuzzyMatch {
    if text == pattern {
        return FuzzyMatch::hit(1.0, MatchTier::Exact);
    }

    if text.contains(pattern) {
        return FuzzyMatch::hit(SUBSTRING_SIMILARITY, MatchTier::Substring);
    }

    // Implied by the substring check; kept so the tier order stays complete
    if text.starts_with(pattern) {
        return FuzzyMatch::hit(PREFIX_SIMILARITY, MatchTier::Prefix);
    }

    let text_chars: Vec<char> = text.chars().collect();
    let pattern_chars: Vec<char> = pattern.chars().collect();

    let whole = similarity_chars(&text_chars, &pattern_chars);
    if whole >= threshold {
        return FuzzyMatch::hit(whole, MatchTier::Whole);
    }

    if let Some(avg) = word_match(text, pattern, threshold) {
        return FuzzyMatch::hit(avg * WORDS_FACTOR, MatchTier::Words);
    }

    if pattern_chars.len() <= WINDOW_SCAN_MAX_PATTERN {
        let best = best_window(&text_chars, &pattern_chars);
        if best >= threshold {
            return FuzzyMatch::hit(best * WINDOW_FACTOR, MatchTier::Window);
        }
    }

    FuzzyMatch::miss()
}

/// Mean best-word similarity when every pattern word finds a text word at or
/// above `threshold`
fn word_match(text: &str, pattern: &str, threshold: f64) -> Option<f64> {
    let text_words: Vec<Vec<char>> = text
        .split_whitespace()
        .map(|w| w.chars().collect())
        .collect();
    let pattern_words: Vec<Vec<char>> = pattern
        .split_whitespace()
        .map(|w| w.chars().collect())
        .collect();

    if pattern_words.is_empty() {
        return None;
    }

    let mut total = 0.0;
    for pattern_word in &pattern_words {
        let best = text_words
            .iter()
            .map(|text_word| similarity_chars(text_word, pattern_word))
            .filter(|s| *s >= threshold)
            .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))?;
        total += best;
    }

    Some(total / pattern_words.len() as f64)
}

/// Best similarity between `pattern` and any window of `text` whose length
/// runs from `min(3, |pattern|)` to `|pattern| + 2`
fn best_window(text: &[char], pattern: &[char]) -> f64 {
    let min_len = pattern.len().min(3);
    let max_len = pattern.len() + 2;

    if text.len() < min_len {
        return 0.0;
    }

    let last_offset = (text.len() - min_len).min(WINDOW_SCAN_MAX_OFFSET);
    let mut best: f64 = 0.0;

    for start in 0..=last_offset {
        let longest = (text.len() - start).min(max_len);
        for len in min_len..=longest {
            let window = &text[start..start + len];
            best = best.max(similarity_chars(window, pattern));
            if best >= WINDOW_SCAN_GOOD_ENOUGH {
                return best;
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let m = fuzzy_match("Treadmill", "treadmill", DEFAULT_THRESHOLD);
        assert!(m.matched);
        assert_eq!(m.similarity, 1.0);
        assert_eq!(m.tier, MatchTier::Exact);
    }

    #[test]
    fn test_accents_do_not_matter() {
        let m = fuzzy_match("Máquina", "maquina", DEFAULT_THRESHOLD);
        assert_eq!(m.tier, MatchTier::Exact);
    }

    #[test]
    fn test_substring_beats_prefix() {
        // "gar" is both a prefix and a substring of "garmin"; substring is checked first
        let m = fuzzy_match("Garmin", "gar", DEFAULT_THRESHOLD);
        assert!(m.matched);
        assert_eq!(m.similarity, 0.95);
        assert_eq!(m.tier, MatchTier::Substring);
    }

    #[test]
    fn test_whole_string_typo() {
        let m = fuzzy_match("Treadmill", "trradmill", DEFAULT_THRESHOLD);
        assert!(m.matched);
        assert_eq!(m.tier, MatchTier::Whole);
        assert!((m.similarity - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_word_order_independent() {
        let m = fuzzy_match("Pro Treadmill X200", "treadmill pro", DEFAULT_THRESHOLD);
        assert!(m.matched);
        assert_eq!(m.tier, MatchTier::Words);
        // both words found verbatim: 1.0 * 0.8
        assert!((m.similarity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_word_match_requires_every_word() {
        let m = fuzzy_match("Pro Treadmill X200", "treadmill zzzzzzzz", DEFAULT_THRESHOLD);
        assert_ne!(m.tier, MatchTier::Words);
    }

    #[test]
    fn test_window_scan() {
        // "cleta" is two substitutions away from "cinta"
        let m = fuzzy_match("Bicicleta Estática", "cinta", DEFAULT_THRESHOLD);
        assert!(m.matched);
        assert_eq!(m.tier, MatchTier::Window);
        assert!((m.similarity - 0.6 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_window_scan_skipped_for_long_patterns() {
        // nine characters: too long for the window scan, and nothing else matches
        let m = fuzzy_match("Banco de Pesas", "cintaxxxx", DEFAULT_THRESHOLD);
        assert!(!m.matched);
        assert_eq!(m.tier, MatchTier::None);
    }

    #[test]
    fn test_no_match() {
        let m = fuzzy_match("Banco de Pesas", "cinta", DEFAULT_THRESHOLD);
        assert!(!m.matched);
        assert_eq!(m.similarity, 0.0);
    }

    #[test]
    fn test_empty_pattern_is_substring_of_anything() {
        let m = fuzzy_match("Rower", "", DEFAULT_THRESHOLD);
        assert_eq!(m.tier, MatchTier::Substring);

        let m = fuzzy_match("", "", DEFAULT_THRESHOLD);
        assert_eq!(m.tier, MatchTier::Exact);
    }

    #[test]
    fn test_text_shorter_than_window() {
        let m = fuzzy_match("ab", "xyzq", DEFAULT_THRESHOLD);
        assert!(!m.matched);
    }

    #[test]
    fn test_best_window_picks_closest_window() {
        let text: Vec<char> = "rowing machine".chars().collect();
        let pattern: Vec<char> = "rowng".chars().collect();
        // "rowing" is one insertion away
        assert!((best_window(&text, &pattern) - 5.0 / 6.0).abs() < 1e-12);

        let pattern: Vec<char> = "mach".chars().collect();
        assert_eq!(best_window(&text, &pattern), 1.0);
    }

    #[test]
    fn test_window_scan_stops_at_offset_cap() {
        let pattern: Vec<char> = "abxdef".chars().collect();

        // "abcdef" starts at offset 49: inside the scanned range
        let near = format!("{}abcdef", "x".repeat(49));
        let near_chars: Vec<char> = near.chars().collect();
        assert!((best_window(&near_chars, &pattern) - 5.0 / 6.0).abs() < 1e-12);

        let m = fuzzy_match(&near, "abxdef", 0.7);
        assert_eq!(m.tier, MatchTier::Window);
        assert!((m.similarity - 5.0 / 6.0 * 0.7).abs() < 1e-12);

        // starts at offset 52: only "xxabcdef" at offset 50 is seen
        let far = format!("{}abcdef", "x".repeat(52));
        let far_chars: Vec<char> = far.chars().collect();
        assert!((best_window(&far_chars, &pattern) - 0.625).abs() < 1e-12);

        let m = fuzzy_match(&far, "abxdef", 0.7);
        assert!(!m.matched);
    }
}
