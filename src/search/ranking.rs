//! Ranking & Scoring System
//!
//! Assigns each candidate name a relevance score in 0..=100. Rules are tried
//! in a fixed precedence order and the first one that applies wins, so the
//! bands below overlap on purpose; reordering them changes result order.

use super::fuzzy::{fuzzy_match_normalized, FuzzyMatch};
use super::parser::ParsedQuery;
use tracing::trace;

/// Relevance score; 0 means the record is excluded
pub type Score = u8;

pub const SCORE_EXACT: Score = 100;
pub const SCORE_PREFIX: Score = 90;
pub const SCORE_ALL_WORDS_LEADING: Score = 80;
pub const SCORE_ALL_WORDS_ADJACENT: Score = 75;
pub const SCORE_ALL_WORDS: Score = 70;
pub const SCORE_SOME_WORD: Score = 50;

/// Fuzzy threshold for queries of at most this many characters is relaxed
const SHORT_QUERY_LEN: usize = 3;
const SHORT_QUERY_THRESHOLD: f64 = 0.5;
const LONG_QUERY_THRESHOLD: f64 = 0.6;

/// Threshold each word must clear in the per-word fuzzy rule
const WORD_THRESHOLD: f64 = 0.5;

/// A fuzzy band: similarity strictly above `floor` maps linearly onto
/// `base + (similarity - floor) * slope`
struct FuzzyBand {
    floor: f64,
    base: f64,
    slope: f64,
}

const STRONG_FUZZY: FuzzyBand = FuzzyBand {
    floor: 0.85,
    base: 85.0,
    slope: 15.0,
};

const GOOD_FUZZY: FuzzyBand = FuzzyBand {
    floor: 0.7,
    base: 60.0,
    slope: 20.0,
};

const WEAK_FUZZY: FuzzyBand = FuzzyBand {
    floor: 0.5,
    base: 30.0,
    slope: 40.0,
};

impl FuzzyBand {
    fn score(&self, fuzzy: &FuzzyMatch) -> Option<Score> {
        if fuzzy.matched && fuzzy.similarity > self.floor {
            Some(round_half_up(self.base + (fuzzy.similarity - self.floor) * self.slope))
        } else {
            None
        }
    }
}

/// Round to the nearest integer, halves going up
fn round_half_up(value: f64) -> Score {
    (value + 0.5).floor().clamp(0.0, 100.0) as Score
}

/// Fuzzy threshold adapted to the query length
pub fn threshold_for(query: &ParsedQuery) -> f64 {
    if query.normalized_len() <= SHORT_QUERY_LEN {
        SHORT_QUERY_THRESHOLD
    } else {
        LONG_QUERY_THRESHOLD
    }
}

/// Score an already-normalized name against a parsed multi-character query
pub fn score_normalized(name: &str, query: &ParsedQuery) -> Score {
    let search = query.normalized.as_str();
    let words = &query.words;

    if name == search {
        return SCORE_EXACT;
    }

    if name.starts_with(search) {
        return SCORE_PREFIX;
    }

    let fuzzy = fuzzy_match_normalized(name, search, threshold_for(query));

    if let Some(score) = STRONG_FUZZY.score(&fuzzy) {
        return score;
    }

    if !words.is_empty() && words.iter().all(|w| name.contains(w.as_str())) {
        if name.starts_with(words[0].as_str()) {
            return SCORE_ALL_WORDS_LEADING;
        }
        if name.contains(search) {
            return SCORE_ALL_WORDS_ADJACENT;
        }
        return SCORE_ALL_WORDS;
    }

    if let Some(score) = GOOD_FUZZY.score(&fuzzy) {
        return score;
    }

    if let Some(avg) = every_word_fuzzy(name, words) {
        return round_half_up(50.0 + avg * 20.0);
    }

    if words.iter().any(|w| name.contains(w.as_str())) {
        return SCORE_SOME_WORD;
    }

    if let Some(score) = WEAK_FUZZY.score(&fuzzy) {
        return score;
    }

    trace!("no rule matched '{}' against '{}'", name, search);
    0
}

/// Mean similarity when every query word fuzzy-matches somewhere in `name`
fn every_word_fuzzy(name: &str, words: &[String]) -> Option<f64> {
    if words.is_empty() {
        return None;
    }

    let mut total = 0.0;
    for word in words {
        let fuzzy = fuzzy_match_normalized(name, word, WORD_THRESHOLD);
        if !fuzzy.matched {
            return None;
        }
        total += fuzzy.similarity;
    }

    Some(total / words.len() as f64)
}
