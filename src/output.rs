//! Markdown and JSON rendering of ranked results

use gym_search::search::{ScoredItem, Score, SearchSnapshot};
use gym_search::{Searchable, SearchableRecord};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<Score>,
}

/// Render ranked results as a markdown list
pub fn format_results(
    results: &[(&SearchableRecord, Option<Score>)],
    total: usize,
    query: &str,
    show_scores: bool,
) -> String {
    let mut out = if query.trim().is_empty() {
        format!("## All {} records\n", total)
    } else {
        format!(
            "## {} of {} records match \"{}\"\n",
            results.len(),
            total,
            query.trim()
        )
    };

    if results.is_empty() {
        out.push_str("\nNo matches.\n");
        return out;
    }

    out.push('\n');
    for (position, (record, score)) in results.iter().enumerate() {
        out.push_str(&format!("{}. {}", position + 1, describe(*record)));
        if show_scores {
            if let Some(score) = score {
                out.push_str(&format!(" (score {})", score));
            }
        }
        out.push('\n');
    }

    out
}

/// Render ranked results as a JSON array
pub fn format_results_json(results: &[(&SearchableRecord, Option<Score>)]) -> serde_json::Result<String> {
    let rows: Vec<ResultRow> = results
        .iter()
        .map(|(record, score)| ResultRow {
            id: record.id(),
            name: record.name(),
            score: *score,
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

/// Render one committed snapshot of a watch session
pub fn format_snapshot(
    snapshot: &SearchSnapshot<SearchableRecord>,
    total: usize,
    limit: Option<usize>,
) -> String {
    let shown: Vec<(&SearchableRecord, Option<Score>)> = snapshot
        .results
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|ScoredItem { item, score }| (item, *score))
        .collect();

    let mut out = format_results(&shown, total, &snapshot.debounced_query, true);
    if shown.len() < snapshot.results.len() {
        out.push_str(&format!(
            "... {} more\n",
            snapshot.results.len() - shown.len()
        ));
    }
    out
}

/// `**name**` followed by the id in backticks, when present
pub fn describe(record: &SearchableRecord) -> String {
    let name = match record.name() {
        Some(name) => format!("**{}**", name),
        None => "*(unnamed)*".to_string(),
    };
    match record.id() {
        Some(id) => format!("{} `{}`", name, id),
        None => name,
    }
}
