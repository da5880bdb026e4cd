//! Error types for configuration loading and validation

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `site_url` could not be parsed as an absolute URL
    #[error("invalid site_url '{url}': {reason}")]
    InvalidSiteUrl {
        /// The rejected value
        url: String,
        /// Parser message
        reason: String,
    },

    /// A structured custom keyword rule is unusable
    #[error("invalid custom keyword rule #{index}: {reason}")]
    InvalidKeywordRule {
        /// Zero-based position of the rule in `custom_keywords`
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// I/O error while reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither `.toml` nor `.json`
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
