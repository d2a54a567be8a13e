//! Smart search with fuzzy matching
//!
//! Normalization, edit-distance similarity and tiered fuzzy matching feed a
//! precedence-ordered scorer; the debounced controller and async session sit
//! on top of the pure ranking pass.

pub mod controller;
pub mod distance;
pub mod engine;
pub mod fuzzy;
pub mod normalize;
pub mod parser;
pub mod ranking;
pub mod session;

pub use controller::{ControllerOptions, ControllerState, QueryController};
pub use distance::{levenshtein_distance, similarity};
pub use engine::{rank, rank_scored, score_name, Ranked};
pub use fuzzy::{fuzzy_match, FuzzyMatch, MatchTier, DEFAULT_THRESHOLD};
pub use normalize::normalize_text;
pub use parser::{ParsedQuery, QueryKind};
pub use ranking::Score;
pub use session::{ScoredItem, SearchSession, SearchSnapshot};
