//! Loading settings from disk

use crate::config::{LinkerConfig, LinkerSettings};
use crate::error::{ConfigError, ConfigResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serialization format of a settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Default settings location: `<config dir>/interlink/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("interlink").join("config.toml"))
}

/// Reads settings files and validates them
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse settings from a string in the given format
    pub fn parse_settings(content: &str, format: ConfigFormat) -> ConfigResult<LinkerSettings> {
        let settings = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(settings)
    }

    /// Read settings from a file without validating them
    pub fn load_settings(path: impl AsRef<Path>) -> ConfigResult<LinkerSettings> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        debug!(path = %path.display(), ?format, "Loaded settings file");
        Self::parse_settings(&content, format)
    }

    /// Read and validate a settings file
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<LinkerConfig> {
        Self::load_settings(path)?.validate()
    }

    /// Load from `path` if given, else from [`default_config_path`] if it
    /// exists, else fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<LinkerConfig> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match default_config_path() {
            Some(default) if default.exists() => Self::load_from_file(default),
            _ => {
                debug!("No settings file found, using defaults");
                Ok(LinkerConfig::default())
            }
        }
    }

    /// Render settings as pretty TOML
    pub fn to_toml(settings: &LinkerSettings) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(settings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("x.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("x.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let settings = ConfigLoader::parse_settings("", ConfigFormat::Toml).unwrap();
        assert_eq!(settings, LinkerSettings::default());
    }

    #[test]
    fn test_parse_json_partial() {
        let json = r#"{ "max_links_total": 0, "case_sensitive": true }"#;
        let settings = ConfigLoader::parse_settings(json, ConfigFormat::Json).unwrap();
        assert_eq!(settings.max_links_total, 0);
        assert!(settings.case_sensitive);
        assert!(settings.exclude_headings);
    }
}
