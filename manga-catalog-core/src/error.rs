use thiserror::Error;

/// Errors raised while validating catalog input before it reaches the store.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Invalid chapter number: {0}")]
    InvalidChapterNumber(String),

    #[error("Invalid page number: {0} (pages are numbered from 1)")]
    InvalidPageNumber(i64),

    #[error("Unknown status: {0}")]
    InvalidStatus(String),

    #[error("Unknown sort mode: {0}")]
    InvalidSortMode(String),

    /// Recognised, but there is no persisted column to sort on.
    #[error("Sort mode '{0}' is not available for the catalog database")]
    UnsupportedSortMode(String),

    #[error("Unknown search scope: {0}")]
    InvalidSearchScope(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid artifact path '{path}': {reason}")]
    InvalidArtifactPath { path: String, reason: String },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

impl ModelError {
    pub fn invalid_pagination(msg: impl Into<String>) -> Self {
        Self::InvalidPagination(msg.into())
    }

    pub fn invalid_artifact_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArtifactPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
