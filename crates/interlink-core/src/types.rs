//! Core data model: candidates, catalog, document context, per-call state

use interlink_config::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// Operator-defined keyword mapping
    CustomKeyword,
    /// Title of a post
    Post,
    /// Title of a page
    Page,
    /// Category name
    Category,
    /// Tag name
    Tag,
}

impl CandidateKind {
    /// Whether the candidate names a post or page of the site
    pub fn is_content(&self) -> bool {
        matches!(self, CandidateKind::Post | CandidateKind::Page)
    }
}

/// Ordering key within a candidate group.
///
/// Sorting ascending by `RankKey` yields descending term length, ties broken
/// by ascending catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankKey {
    /// Term length in characters
    pub term_len: usize,
    /// Position in the source listing
    pub catalog_order: usize,
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .term_len
            .cmp(&self.term_len)
            .then(self.catalog_order.cmp(&other.catalog_order))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A term/target pair eligible for automatic linking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    /// Literal term to find in the text
    pub term: String,
    /// Resolved link target
    pub target_url: String,
    /// Where the candidate came from
    pub kind: CandidateKind,
    /// Identifier of the source entity, if any
    pub source_id: Option<String>,
    /// Ordering key within the candidate's group
    pub rank_key: RankKey,
}

impl LinkCandidate {
    /// Create a candidate; `catalog_order` is its position in the source listing
    pub fn new(
        term: impl Into<String>,
        target_url: impl Into<String>,
        kind: CandidateKind,
        source_id: Option<String>,
        catalog_order: usize,
    ) -> Self {
        let term = term.into();
        let rank_key = RankKey {
            term_len: term.chars().count(),
            catalog_order,
        };
        Self {
            term,
            target_url: target_url.into(),
            kind,
            source_id,
            rank_key,
        }
    }
}

/// Sort candidates by rank: longest term first, catalog order on ties
pub fn rank_candidates(candidates: &mut [LinkCandidate]) {
    candidates.sort_by(|a, b| a.rank_key.cmp(&b.rank_key));
}

/// Priority bucket of a candidate group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Operator keywords
    CustomKeyword,
    /// Post and page titles, interleaved
    Content,
    /// Category names
    Category,
    /// Tag names
    Tag,
}

/// One ranked, immutable group of candidates
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    /// Priority bucket
    pub kind: GroupKind,
    /// Candidates, already ranked
    pub candidates: Arc<[LinkCandidate]>,
}

/// Ranked, read-only candidate snapshot for one or more annotation calls.
///
/// Groups are always iterated in priority order: custom keywords, content,
/// categories, tags.
#[derive(Debug, Clone, Default)]
pub struct CandidateCatalog {
    groups: Vec<CandidateGroup>,
}

impl CandidateCatalog {
    /// Build a catalog from already-ranked groups. Groups are reordered by
    /// priority; empty groups are dropped.
    pub fn from_groups(groups: impl IntoIterator<Item = CandidateGroup>) -> Self {
        let mut groups: Vec<CandidateGroup> = groups
            .into_iter()
            .filter(|g| !g.candidates.is_empty())
            .collect();
        groups.sort_by_key(|g| g.kind);
        Self { groups }
    }

    /// Build a catalog from unranked lists, ranking each one
    pub fn from_lists(
        custom: Vec<LinkCandidate>,
        content: Vec<LinkCandidate>,
        categories: Vec<LinkCandidate>,
        tags: Vec<LinkCandidate>,
    ) -> Self {
        let group = |kind, mut list: Vec<LinkCandidate>| {
            rank_candidates(&mut list);
            CandidateGroup {
                kind,
                candidates: list.into(),
            }
        };
        Self::from_groups([
            group(GroupKind::CustomKeyword, custom),
            group(GroupKind::Content, content),
            group(GroupKind::Category, categories),
            group(GroupKind::Tag, tags),
        ])
    }

    /// Groups in priority order
    pub fn groups(&self) -> &[CandidateGroup] {
        &self.groups
    }

    /// All candidates in processing order
    pub fn iter(&self) -> impl Iterator<Item = &LinkCandidate> {
        self.groups.iter().flat_map(|g| g.candidates.iter())
    }

    /// Total number of candidates
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.candidates.len()).sum()
    }

    /// Whether the catalog has no candidates
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The document being annotated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContext {
    /// Identifier of the entity being rendered
    pub entity_id: Option<String>,
    /// Kind of the entity
    pub entity_kind: EntityKind,
    /// URL slug of the entity
    pub entity_slug: Option<String>,
    /// Title of the entity
    pub entity_title: Option<String>,
    /// The entity's own address
    pub permalink: Option<String>,
    /// Text is a comment body
    pub is_comment: bool,
    /// Rendering for a feed
    pub is_feed: bool,
    /// Rendering a single-document view
    pub is_single_view: bool,
}

impl DocumentContext {
    /// Context for a single-view post or page
    pub fn single(kind: EntityKind, id: impl Into<String>, permalink: impl Into<String>) -> Self {
        Self {
            entity_id: Some(id.into()),
            entity_kind: kind,
            permalink: Some(permalink.into()),
            is_comment: kind == EntityKind::Comment,
            is_single_view: true,
            ..Default::default()
        }
    }

    /// Keys the entity can be ignored by: id, slug and title
    pub fn identity_keys(&self) -> impl Iterator<Item = &str> {
        [&self.entity_id, &self.entity_slug, &self.entity_title]
            .into_iter()
            .filter_map(|k| k.as_deref())
    }
}

/// Per-call counters. Created fresh for each document and discarded after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationState {
    /// Anchors inserted so far
    pub total_inserted: usize,
    /// Anchors inserted per term
    pub per_term_count: HashMap<String, usize>,
    /// Anchors inserted per normalized target URL
    pub per_target_url_count: HashMap<String, usize>,
    /// Normalized target URLs linked so far
    pub used_target_urls: HashSet<String>,
}

impl AnnotationState {
    /// Fresh state
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors inserted for `url` so far
    pub fn url_count(&self, url: &str) -> usize {
        self.per_target_url_count.get(url).copied().unwrap_or(0)
    }

    /// Record `count` anchors for `term` pointing at `url`. Anchors that are
    /// exempt from the same-target cap pass `metered = false` and are left out
    /// of `per_target_url_count`.
    pub fn record(&mut self, term: &str, url: &str, count: usize, metered: bool) {
        if count == 0 {
            return;
        }
        self.total_inserted += count;
        *self.per_term_count.entry(term.to_string()).or_insert(0) += count;
        if metered {
            *self.per_target_url_count.entry(url.to_string()).or_insert(0) += count;
        }
        self.used_target_urls.insert(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(term: &str, order: usize) -> LinkCandidate {
        LinkCandidate::new(term, format!("/{}", order), CandidateKind::Post, None, order)
    }

    #[test]
    fn test_rank_longest_first_then_catalog_order() {
        let mut list = vec![cand("Cat", 0), cand("Category", 1), cand("Dog", 2), cand("Categories", 3)];
        rank_candidates(&mut list);
        let terms: Vec<&str> = list.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["Categories", "Category", "Cat", "Dog"]);
    }

    #[test]
    fn test_rank_counts_characters_not_bytes() {
        let c = cand("Über", 0);
        assert_eq!(c.rank_key.term_len, 4);
    }

    #[test]
    fn test_catalog_orders_groups_by_priority() {
        let tag = LinkCandidate::new("Longest tag name", "/t", CandidateKind::Tag, None, 0);
        let kw = LinkCandidate::new("kw", "/k", CandidateKind::CustomKeyword, None, 0);
        let catalog = CandidateCatalog::from_lists(vec![kw], vec![], vec![], vec![tag]);

        assert_eq!(catalog.groups().len(), 2);
        assert_eq!(catalog.groups()[0].kind, GroupKind::CustomKeyword);
        let terms: Vec<&str> = catalog.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["kw", "Longest tag name"]);
    }

    #[test]
    fn test_state_record_is_cumulative() {
        let mut state = AnnotationState::new();
        state.record("python", "https://x/", 1, true);
        state.record("php", "https://x/", 1, true);
        state.record("php", "https://x/", 0, true);
        state.record("rust", "https://y/", 1, false);

        assert_eq!(state.total_inserted, 3);
        assert_eq!(state.url_count("https://x/"), 2);
        assert_eq!(state.url_count("https://y/"), 0);
        assert_eq!(state.per_term_count["php"], 1);
        assert!(state.used_target_urls.contains("https://y/"));
    }
}
