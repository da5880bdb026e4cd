//! # Interlink Configuration
//!
//! Typed configuration for the Interlink annotation engine.
//!
//! ## Features
//!
//! - `LinkerSettings`: the serde file form, every field optional with defaults
//! - `LinkerConfig`: the validated, immutable value the engine consumes
//! - TOML and JSON loading via [`ConfigLoader`]
//! - Migration from the legacy flat option map (`"on"`/`""` truthy strings)
//! - Custom keyword line parsing (`kw1|kw2|https://target/`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use interlink_config::ConfigLoader;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::load_from_file("interlink.toml")?;
//!     println!("max links per document: {}", config.max_links_total);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod entity;
mod error;
mod keywords;
mod loader;
mod migration;

pub use config::*;
pub use entity::EntityKind;
pub use error::{ConfigError, ConfigResult};
pub use keywords::{keyword_targets, parse_keyword_lines, KeywordRule, ParsedKeywords};
pub use loader::{default_config_path, ConfigFormat, ConfigLoader};
pub use migration::{ConfigMigrator, LegacyOptions, MigrationReport};
