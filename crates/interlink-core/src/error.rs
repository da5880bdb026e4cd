//! Error types for the annotation engine

use thiserror::Error;

/// Errors from the protection scanner
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    /// The input already contains a placeholder sentinel character, so
    /// masked spans could not be told apart from real content
    #[error("input contains placeholder sentinel at byte {0}")]
    SentinelCollision(usize),
}

/// Errors reported by candidate catalog providers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The backing content source failed
    #[error("catalog source error: {0}")]
    Source(String),

    /// The provider cannot serve this listing right now
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
