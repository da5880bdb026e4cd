//! Raw content records and the source trait

use interlink_core::{CandidateKind, CatalogResult, PermalinkResolver};
use serde::{Deserialize, Serialize};

/// Publication status of a content record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// Publicly visible
    #[default]
    Published,
    /// Not yet published
    Draft,
    /// Awaiting review
    Pending,
    /// Visible to its author only
    Private,
    /// Deleted
    Trash,
}

/// Kind of a content record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// A post
    Post,
    /// A page
    Page,
}

impl From<ContentKind> for CandidateKind {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Post => CandidateKind::Post,
            ContentKind::Page => CandidateKind::Page,
        }
    }
}

/// A post or page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Identifier
    pub id: String,
    /// Title, used as the candidate term
    pub title: String,
    /// Post or page
    pub kind: ContentKind,
    /// Publication status
    #[serde(default)]
    pub status: ContentStatus,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Explicit address
    #[serde(default)]
    pub permalink: Option<String>,
}

/// Taxonomy of a term record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taxonomy {
    /// Category
    Category,
    /// Tag
    Tag,
}

impl Taxonomy {
    /// URL path segment used for derived permalinks
    pub fn base(&self) -> &'static str {
        match self {
            Taxonomy::Category => "category",
            Taxonomy::Tag => "tag",
        }
    }
}

impl From<Taxonomy> for CandidateKind {
    fn from(taxonomy: Taxonomy) -> Self {
        match taxonomy {
            Taxonomy::Category => CandidateKind::Category,
            Taxonomy::Tag => CandidateKind::Tag,
        }
    }
}

/// A category or tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Identifier
    pub id: String,
    /// Display name, used as the candidate term
    pub name: String,
    /// Category or tag
    pub taxonomy: Taxonomy,
    /// Number of documents using the term
    #[serde(default)]
    pub usage_count: u32,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Explicit address
    #[serde(default)]
    pub permalink: Option<String>,
}

/// Backing store of content and taxonomy records.
///
/// Implementations return everything they have; filtering and ranking are
/// done by [`CachedCatalogProvider`](crate::CachedCatalogProvider).
pub trait ContentSource: PermalinkResolver {
    /// All posts and pages, in source order
    fn content(&self) -> CatalogResult<Vec<ContentRecord>>;

    /// All terms of `taxonomy`, in source order
    fn terms(&self, taxonomy: Taxonomy) -> CatalogResult<Vec<TermRecord>>;
}
