//! Searchable records and record file loading

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Anything the search engine can rank by display name
pub trait Searchable {
    fn id(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;
}

/// A record as supplied by the record provider: brand, location or machine
/// documents all carry an optional id and display name. Other fields in the
/// source document are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchableRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SearchableRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }

}

impl Searchable for SearchableRecord {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn id(&self) -> Option<&str> {
        (**self).id()
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

impl<T: Searchable + ?Sized> Searchable for Arc<T> {
    fn id(&self) -> Option<&str> {
        (**self).id()
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

/// Parse a JSON array of records
pub fn parse_records(json: &str) -> Result<Vec<SearchableRecord>, AppError> {
    serde_json::from_str(json)
        .map_err(|e| AppError::RecordsLoadFailed(format!("Invalid records JSON: {}", e)))
}

/// Load a JSON array of records from disk
pub fn load_records(path: &Path) -> Result<Vec<SearchableRecord>, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "Records file not found: {}",
            path.display()
        )));
    }

    let data = std::fs::read_to_string(path)?;
    let records = parse_records(&data)?;

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
