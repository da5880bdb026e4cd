//! Collaborator interfaces and catalog assembly
//!
//! The engine never touches storage. Candidate lists and permalinks come
//! from implementations of these traits, already filtered and ranked; the
//! `interlink-catalog` crate provides a caching one.

use crate::error::CatalogResult;
use crate::types::{rank_candidates, CandidateCatalog, CandidateGroup, CandidateKind, GroupKind, LinkCandidate};
use interlink_config::{keyword_targets, LinkerConfig};
use std::sync::Arc;
use tracing::warn;

/// Source of ranked candidate lists.
///
/// Every list is filtered (published only, minimum term length) and sorted
/// by descending term length. Caching and invalidation are the
/// implementation's business.
pub trait CandidateCatalogProvider: Send + Sync {
    /// Operator keyword candidates beyond those in the configuration
    fn list_custom_keywords(&self) -> CatalogResult<Arc<[LinkCandidate]>> {
        Ok(Arc::from(Vec::new()))
    }

    /// Post and page titles, interleaved
    fn list_posts_and_pages(&self) -> CatalogResult<Arc<[LinkCandidate]>>;

    /// Categories used at least `min_usage` times
    fn list_categories(&self, min_usage: u32) -> CatalogResult<Arc<[LinkCandidate]>>;

    /// Tags used at least `min_usage` times
    fn list_tags(&self, min_usage: u32) -> CatalogResult<Arc<[LinkCandidate]>>;
}

/// Maps an entity to its public address
pub trait PermalinkResolver: Send + Sync {
    /// Permalink of entity `id`, or `None` when it cannot be resolved
    fn resolve(&self, kind: CandidateKind, id: &str) -> Option<String>;
}

/// Candidates for the configured keyword rules, ranked.
///
/// Ignored keywords are dropped; a keyword defined twice keeps its first
/// position and its last URL.
pub fn custom_keyword_candidates(config: &LinkerConfig) -> Vec<LinkCandidate> {
    let mut candidates: Vec<LinkCandidate> =
        keyword_targets(&config.custom_keywords, |kw| config.is_term_ignored(kw))
            .into_iter()
            .enumerate()
            .map(|(order, (keyword, url))| {
                LinkCandidate::new(keyword, url, CandidateKind::CustomKeyword, None, order)
            })
            .collect();
    rank_candidates(&mut candidates);
    candidates
}

impl CandidateCatalog {
    /// Assemble a catalog snapshot from a provider.
    ///
    /// A failing listing is logged and treated as empty. The `link_*`
    /// toggles decide which listings are requested; posts and pages share
    /// one listing, filtered by kind.
    pub fn from_provider<P>(provider: &P, config: &LinkerConfig) -> Self
    where
        P: CandidateCatalogProvider + ?Sized,
    {
        let mut custom = custom_keyword_candidates(config);
        if let Some(extra) = fetch("custom keywords", || provider.list_custom_keywords()) {
            let offset = custom.len();
            custom.extend(extra.iter().enumerate().map(|(i, c)| {
                let mut c = c.clone();
                c.rank_key.catalog_order = offset + i;
                c
            }));
            rank_candidates(&mut custom);
        }

        let mut groups = vec![CandidateGroup {
            kind: GroupKind::CustomKeyword,
            candidates: custom.into(),
        }];

        if config.link_posts || config.link_pages {
            if let Some(list) = fetch("posts and pages", || provider.list_posts_and_pages()) {
                let candidates = if config.link_posts && config.link_pages {
                    list
                } else {
                    list.iter()
                        .filter(|c| match c.kind {
                            CandidateKind::Post => config.link_posts,
                            CandidateKind::Page => config.link_pages,
                            _ => true,
                        })
                        .cloned()
                        .collect()
                };
                groups.push(CandidateGroup {
                    kind: GroupKind::Content,
                    candidates,
                });
            }
        }

        let min_usage = config.min_usage_threshold;
        if config.link_categories {
            if let Some(candidates) = fetch("categories", || provider.list_categories(min_usage)) {
                groups.push(CandidateGroup {
                    kind: GroupKind::Category,
                    candidates,
                });
            }
        }
        if config.link_tags {
            if let Some(candidates) = fetch("tags", || provider.list_tags(min_usage)) {
                groups.push(CandidateGroup {
                    kind: GroupKind::Tag,
                    candidates,
                });
            }
        }

        Self::from_groups(groups)
    }
}

fn fetch<F>(listing: &str, list: F) -> Option<Arc<[LinkCandidate]>>
where
    F: FnOnce() -> CatalogResult<Arc<[LinkCandidate]>>,
{
    match list() {
        Ok(candidates) => Some(candidates),
        Err(e) => {
            warn!(listing, error = %e, "candidate listing failed, skipping group");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use interlink_config::KeywordRule;

    struct FixedProvider {
        fail_content: bool,
    }

    impl CandidateCatalogProvider for FixedProvider {
        fn list_posts_and_pages(&self) -> CatalogResult<Arc<[LinkCandidate]>> {
            if self.fail_content {
                return Err(CatalogError::Source("database offline".into()));
            }
            Ok(vec![
                LinkCandidate::new("Getting Started", "/start/", CandidateKind::Page, Some("2".into()), 0),
                LinkCandidate::new("Release Notes", "/notes/", CandidateKind::Post, Some("3".into()), 1),
            ]
            .into())
        }

        fn list_categories(&self, min_usage: u32) -> CatalogResult<Arc<[LinkCandidate]>> {
            assert_eq!(min_usage, 4);
            Ok(vec![LinkCandidate::new("Tutorials", "/cat/tutorials/", CandidateKind::Category, None, 0)].into())
        }

        fn list_tags(&self, _min_usage: u32) -> CatalogResult<Arc<[LinkCandidate]>> {
            Err(CatalogError::Unavailable("tags disabled upstream".into()))
        }
    }

    fn config() -> LinkerConfig {
        let mut config = LinkerConfig::default();
        config.custom_keywords = vec![
            KeywordRule::new(["rust", "About"], "https://x/rust/"),
            KeywordRule::new(["cargo"], "https://x/cargo/"),
        ];
        config.min_usage_threshold = 4;
        config
    }

    #[test]
    fn test_custom_keywords_skip_ignored_terms() {
        let terms: Vec<String> = custom_keyword_candidates(&config())
            .into_iter()
            .map(|c| c.term)
            .collect();
        assert_eq!(terms, vec!["cargo", "rust"]);
    }

    #[test]
    fn test_from_provider_honours_toggles() {
        let mut config = config();
        config.link_categories = true;
        config.link_pages = false;

        let catalog = CandidateCatalog::from_provider(&FixedProvider { fail_content: false }, &config);
        let kinds: Vec<GroupKind> = catalog.groups().iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![GroupKind::CustomKeyword, GroupKind::Content, GroupKind::Category]);

        let content: Vec<&str> = catalog.groups()[1].candidates.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(content, vec!["Release Notes"]);
    }

    #[test]
    fn test_failing_listing_is_treated_as_empty() {
        let mut config = config();
        config.link_tags = true;

        let catalog = CandidateCatalog::from_provider(&FixedProvider { fail_content: true }, &config);
        let kinds: Vec<GroupKind> = catalog.groups().iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![GroupKind::CustomKeyword]);
        assert_eq!(catalog.len(), 2);
    }
}
