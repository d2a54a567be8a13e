//! Search Engine Integration
//!
//! Ties together query parsing, normalization and scoring into a single
//! ranking pass over caller-supplied records. Ranking holds no state between
//! calls; the normalized-name memo lives for one pass only.

use super::normalize::normalize_text;
use super::parser::{ParsedQuery, QueryKind};
use super::ranking::{score_normalized, Score};
use crate::records::Searchable;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A record in the result list, with its score when the query was scored
#[derive(Debug)]
pub struct Ranked<'a, T> {
    pub item: &'a T,
    /// `None` for pass-through and single-character queries
    pub score: Option<Score>,
}

impl<T> Clone for Ranked<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ranked<'_, T> {}

/// Rank `records` against `query`, most relevant first
pub fn rank<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    rank_scored(records, query)
        .into_iter()
        .map(|ranked| ranked.item)
        .collect()
}

/// Rank `records` against `query`, keeping the score of each result
pub fn rank_scored<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<Ranked<'a, T>> {
    let parsed = ParsedQuery::parse(query);
    rank_indices(records, &parsed)
        .into_iter()
        .map(|(index, score)| Ranked {
            item: &records[index],
            score,
        })
        .collect()
}

/// Score `name` against `query` with the multi-character rules
pub fn score_name(name: &str, query: &str) -> Score {
    let parsed = ParsedQuery::parse(query);
    if parsed.words.is_empty() {
        return 0;
    }
    score_normalized(&normalize_text(name), &parsed)
}

/// Core ranking pass: positions into `records` with their scores
pub(crate) fn rank_indices<T: Searchable>(
    records: &[T],
    query: &ParsedQuery,
) -> Vec<(usize, Option<Score>)> {
    match query.kind {
        QueryKind::Empty => (0..records.len()).map(|i| (i, None)).collect(),
        QueryKind::SingleChar => filter_single_char(records, &query.normalized),
        QueryKind::Terms => score_all(records, query),
    }
}

/// One-character fast path: containment only, input order kept
fn filter_single_char<T: Searchable>(records: &[T], needle: &str) -> Vec<(usize, Option<Score>)> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            record
                .name()
                .is_some_and(|name| normalize_text(name).contains(needle))
        })
        .map(|(i, _)| (i, None))
        .collect()
}

fn score_all<T: Searchable>(records: &[T], query: &ParsedQuery) -> Vec<(usize, Option<Score>)> {
    let mut normalized_names: HashMap<&str, String> = HashMap::new();
    let mut scored: Vec<(usize, Score)> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let Some(name) = record.name() else {
            continue;
        };

        let normalized = normalized_names
            .entry(name)
            .or_insert_with(|| normalize_text(name));

        let score = score_normalized(normalized, query);
        trace!("'{}' scored {}", name, score);

        if score > 0 {
            scored.push((index, score));
        }
    }

    // Stable: equal scores keep input order
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    debug!(
        "Ranked {} of {} records for '{}' ({} distinct names)",
        scored.len(),
        records.len(),
        query.normalized,
        normalized_names.len()
    );

    scored
        .into_iter()
        .map(|(index, score)| (index, Some(score)))
        .collect()
}
