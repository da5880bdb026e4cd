//! # Interlink Catalog
//!
//! Builds the candidate lists the annotation engine consumes.
//!
//! - [`ContentSource`]: where posts, pages, categories and tags come from
//! - [`CachedCatalogProvider`]: filters, ranks and caches those lists, and
//!   drops them when content changes ([`ContentEvent`]) or after the TTL
//! - [`InMemorySource`]: a source read from a JSON export
//!
//! ```rust,no_run
//! use interlink_catalog::{CachedCatalogProvider, InMemorySource};
//! use interlink_config::LinkerConfig;
//! use interlink_core::CandidateCatalog;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = CachedCatalogProvider::new(InMemorySource::load("catalog.json")?);
//! let catalog = CandidateCatalog::from_provider(&provider, &LinkerConfig::default());
//! println!("{} candidates", catalog.len());
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod memory;
mod source;

pub use cache::{
    CacheConfig, CacheStats, CachedCatalogProvider, ContentEvent, DEFAULT_CACHE_TTL,
    DEFAULT_MIN_TERM_CHARS,
};
pub use error::{SourceError, SourceResult};
pub use memory::InMemorySource;
pub use source::{ContentKind, ContentRecord, ContentSource, ContentStatus, Taxonomy, TermRecord};
