//! gym-search: smart search over gym equipment, brand and location records
//!
//! - [`search::rank`] ranks a record list against a free-text query
//! - [`search::QueryController`] debounces query changes before ranking
//! - [`search::SearchSession`] drives a controller on a tokio task

pub mod config;
pub mod error;
pub mod records;
pub mod search;

pub use error::AppError;
pub use records::{Searchable, SearchableRecord};
pub use search::{rank, rank_scored, QueryController, SearchSession};
