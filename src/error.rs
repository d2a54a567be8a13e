//! Error types for record loading, configuration and the search session
//!
//! Ranking itself is total and never produces these.

use thiserror::Error;

/// Longest query the CLI accepts
pub const MAX_QUERY_LEN: usize = 500;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to load records: {0}")]
    RecordsLoadFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Search session closed")]
    SessionClosed,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::RecordsLoadFailed(_) => "records_load_failed",
            AppError::ConfigError(_) => "config_error",
            AppError::SessionClosed => "session_closed",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Convert std::io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(AppError::InvalidInput(format!(
            "Query too long, maximum {} characters",
            MAX_QUERY_LEN
        )));
    }

    Ok(())
}

pub fn validate_limit(limit: Option<usize>) -> Result<(), AppError> {
    if limit == Some(0) {
        return Err(AppError::InvalidInput(
            "Limit must be at least 1".to_string(),
        ));
    }

    Ok(())
}
