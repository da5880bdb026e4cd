use anyhow::{Context, Result};
use interlink_config::{ConfigLoader, ConfigMigrator, LegacyOptions, MigrationReport};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Execute the migrate-legacy subcommand
pub fn execute(json: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let report = migrate_file(&json)?;

    for line in &report.info {
        info!("{}", line);
    }
    for line in &report.warnings {
        warn!("{}", line);
        eprintln!("warning: {}", line);
    }

    let toml = ConfigLoader::to_toml(&report.settings).context("Failed to render TOML")?;
    match output {
        Some(path) => std::fs::write(&path, toml)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", toml),
    }
    Ok(())
}

/// Read a legacy options export and migrate it
pub fn migrate_file(path: &Path) -> Result<MigrationReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let legacy = LegacyOptions::from_json(&json)
        .with_context(|| format!("{} is not a legacy options object", path.display()))?;
    Ok(ConfigMigrator::migrate(&legacy))
}
