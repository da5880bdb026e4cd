//! Errors raised while loading content sources

use thiserror::Error;

/// Errors from loading a content source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read
    #[error("failed to read content source: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid content export
    #[error("invalid content source JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The `base_url` is not an absolute http(s) address
    #[error("invalid base_url '{0}'")]
    InvalidBaseUrl(String),
}

/// Result type for source loading
pub type SourceResult<T> = Result<T, SourceError>;
