//! JSON-backed in-memory content source
//!
//! ```json
//! {
//!   "base_url": "https://example.com",
//!   "content": [{ "id": "1", "title": "Hello World", "kind": "post", "slug": "hello-world" }],
//!   "terms": [{ "id": "7", "name": "Tutorials", "taxonomy": "category", "usage_count": 4 }]
//! }
//! ```
//!
//! Records without an explicit `permalink` get `base_url/slug/` (content)
//! or `base_url/category/slug/` and `base_url/tag/slug/` (terms).

use crate::error::{SourceError, SourceResult};
use crate::source::{ContentRecord, ContentSource, Taxonomy, TermRecord};
use interlink_core::{CandidateKind, CatalogResult, PermalinkResolver};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// A content source held entirely in memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemorySource {
    /// Site root used to derive missing permalinks
    #[serde(default)]
    pub base_url: Option<String>,
    /// Posts and pages
    #[serde(default)]
    pub content: Vec<ContentRecord>,
    /// Categories and tags
    #[serde(default)]
    pub terms: Vec<TermRecord>,
}

impl InMemorySource {
    /// Parse a JSON export
    pub fn from_json(json: &str) -> SourceResult<Self> {
        let source: Self = serde_json::from_str(json)?;
        if let Some(base) = &source.base_url {
            let base = base.trim();
            let is_web_url = Url::parse(base)
                .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
            if !is_web_url {
                return Err(SourceError::InvalidBaseUrl(base.to_string()));
            }
        }
        Ok(source)
    }

    /// Read and parse a JSON export
    pub fn load(path: impl AsRef<Path>) -> SourceResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    fn derive(&self, prefix: Option<&str>, slug: Option<&str>) -> Option<String> {
        let base = self.base_url.as_deref()?.trim().trim_end_matches('/');
        let slug = slug.map(str::trim).filter(|s| !s.is_empty())?;
        Some(match prefix {
            Some(prefix) => format!("{}/{}/{}/", base, prefix, slug),
            None => format!("{}/{}/", base, slug),
        })
    }
}

impl PermalinkResolver for InMemorySource {
    fn resolve(&self, kind: CandidateKind, id: &str) -> Option<String> {
        match kind {
            CandidateKind::Post | CandidateKind::Page => {
                let record = self
                    .content
                    .iter()
                    .find(|r| r.id == id && CandidateKind::from(r.kind) == kind)?;
                record
                    .permalink
                    .clone()
                    .or_else(|| self.derive(None, record.slug.as_deref()))
            }
            CandidateKind::Category | CandidateKind::Tag => {
                let record = self
                    .terms
                    .iter()
                    .find(|r| r.id == id && CandidateKind::from(r.taxonomy) == kind)?;
                record
                    .permalink
                    .clone()
                    .or_else(|| self.derive(Some(record.taxonomy.base()), record.slug.as_deref()))
            }
            CandidateKind::CustomKeyword => None,
        }
    }
}

impl ContentSource for InMemorySource {
    fn content(&self) -> CatalogResult<Vec<ContentRecord>> {
        Ok(self.content.clone())
    }

    fn terms(&self, taxonomy: Taxonomy) -> CatalogResult<Vec<TermRecord>> {
        Ok(self
            .terms
            .iter()
            .filter(|t| t.taxonomy == taxonomy)
            .cloned()
            .collect())
    }
}
