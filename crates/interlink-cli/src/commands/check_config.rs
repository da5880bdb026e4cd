use anyhow::{Context, Result};
use interlink_config::{default_config_path, ConfigLoader, LinkerConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the check-config subcommand
pub fn execute(path: Option<PathBuf>) -> Result<()> {
    println!("{}", render(path.as_deref())?);
    Ok(())
}

/// Validate the settings at `path` and render the effective config as JSON
pub fn render(path: Option<&Path>) -> Result<String> {
    let config = load(path)?;
    serde_json::to_string_pretty(&config).context("Failed to serialize configuration")
}

fn load(path: Option<&Path>) -> Result<LinkerConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Checking settings file");
            ConfigLoader::load_from_file(path)
                .with_context(|| format!("Invalid settings file {}", path.display()))
        }
        None => {
            if let Some(default) = default_config_path() {
                info!(path = %default.display(), "Checking default settings location");
            }
            ConfigLoader::load_or_default(None).context("Invalid default settings file")
        }
    }
}
