//! Debounced query controller
//!
//! Sits between a rapidly changing raw query and the ranking engine. Time is
//! passed in by the caller, so the controller itself never sleeps: a driver
//! (see [`crate::search::session`]) or a UI loop calls [`QueryController::poll`]
//! once [`QueryController::deadline`] has passed.

use super::engine::rank_indices;
use super::parser::ParsedQuery;
use super::ranking::Score;
use crate::records::Searchable;
use std::fmt;
use tokio::time::{Duration, Instant};
use tracing::debug;

/// Default debounce delay in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Callback receiving the top-ranked record
pub type AutoSelectFn<T> = Box<dyn FnMut(&T) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No timer armed and nothing committed since the last clear
    Idle,
    /// A query change is waiting for its debounce timer
    Pending { deadline: Instant },
    /// The debounced query matches the raw query and results are current
    Committed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    pub debounce_delay: Duration,
    pub auto_select: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            auto_select: false,
        }
    }
}

pub struct QueryController<T> {
    items: Vec<T>,
    options: ControllerOptions,
    raw_query: String,
    debounced_query: String,
    state: ControllerState,
    /// Ranked positions into `items`
    filtered: Vec<(usize, Option<Score>)>,
    on_auto_select: Option<AutoSelectFn<T>>,
    revision: u64,
}

impl<T: Searchable> QueryController<T> {
    pub fn new(items: Vec<T>, options: ControllerOptions) -> Self {
        let filtered = rank_indices(&items, &ParsedQuery::parse(""));
        Self {
            items,
            options,
            raw_query: String::new(),
            debounced_query: String::new(),
            state: ControllerState::Idle,
            filtered,
            on_auto_select: None,
            revision: 0,
        }
    }

    /// Register the auto-select callback. It only fires when
    /// `options.auto_select` is set.
    pub fn with_auto_select(mut self, callback: impl FnMut(&T) + Send + 'static) -> Self {
        self.on_auto_select = Some(Box::new(callback));
        self
    }

    /// Record a raw query change and (re)arm the debounce timer
    pub fn set_query(&mut self, text: impl Into<String>, now: Instant) {
        self.raw_query = text.into();
        let deadline = now + self.options.debounce_delay;
        self.state = ControllerState::Pending { deadline };
    }

    /// Commit the raw query if its timer has expired. Returns true when a
    /// commit happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            ControllerState::Pending { deadline } if now >= deadline => {
                self.commit();
                true
            }
            _ => false,
        }
    }

    /// Commit a pending query without waiting for its timer
    pub fn flush(&mut self) -> bool {
        if matches!(self.state, ControllerState::Pending { .. }) {
            self.commit();
            true
        } else {
            false
        }
    }

    /// Reset both queries immediately and cancel any pending timer
    pub fn clear_search(&mut self) {
        self.raw_query.clear();
        self.debounced_query.clear();
        self.state = ControllerState::Idle;
        self.recompute();
    }

    /// Replace the record list and rerank against the current debounced query
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.recompute();
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced_query
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// When the pending timer fires, if one is armed
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ControllerState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Number of ranking passes since construction
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current ranked results, most relevant first
    pub fn filtered_items(&self) -> Vec<&T> {
        self.filtered.iter().map(|(i, _)| &self.items[*i]).collect()
    }

    /// Current ranked results with their scores
    pub fn filtered_scored(&self) -> Vec<(&T, Option<Score>)> {
        self.filtered
            .iter()
            .map(|(i, score)| (&self.items[*i], *score))
            .collect()
    }

    fn commit(&mut self) {
        self.debounced_query.clone_from(&self.raw_query);
        self.state = ControllerState::Committed;
        debug!("Committed debounced query '{}'", self.debounced_query);
        self.recompute();
    }

    fn recompute(&mut self) {
        let parsed = ParsedQuery::parse(&self.debounced_query);
        self.filtered = rank_indices(&self.items, &parsed);
        self.revision += 1;

        debug!(
            "Revision {}: {} of {} records for '{}'",
            self.revision,
            self.filtered.len(),
            self.items.len(),
            self.debounced_query
        );

        self.auto_select();
    }

    fn auto_select(&mut self) {
        if !self.options.auto_select || self.debounced_query.trim().is_empty() {
            return;
        }

        let Some((top, _)) = self.filtered.first() else {
            return;
        };

        if let Some(callback) = self.on_auto_select.as_mut() {
            callback(&self.items[*top]);
        }
    }
}

impl<T> fmt::Debug for QueryController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryController")
            .field("items", &self.items.len())
            .field("options", &self.options)
            .field("raw_query", &self.raw_query)
            .field("debounced_query", &self.debounced_query)
            .field("state", &self.state)
            .field("filtered", &self.filtered.len())
            .field("revision", &self.revision)
            .finish()
    }
}
