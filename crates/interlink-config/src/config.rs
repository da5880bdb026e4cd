//! Linker settings (file form) and the validated configuration

use crate::entity::EntityKind;
use crate::error::{ConfigError, ConfigResult};
use crate::keywords::{parse_keyword_lines, KeywordRule};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;
use url::Url;

/// Default cap on anchors per document
pub const DEFAULT_MAX_LINKS_TOTAL: usize = 3;

/// Default cap on anchors per term
pub const DEFAULT_MAX_LINKS_PER_TERM: i64 = 1;

/// Default cap on anchors per target URL (only when per-term cap is 1)
pub const DEFAULT_MAX_SAME_TARGET_URL: usize = 1;

/// Default minimum usage count for taxonomy terms
pub const DEFAULT_MIN_USAGE_THRESHOLD: u32 = 1;

/// Default ceiling on candidates examined per document
pub const DEFAULT_MAX_CANDIDATES_SCANNED: usize = 10_000;

fn default_page_builder_markers() -> Vec<String> {
    vec!["[vc_".to_string(), "[tdb_".to_string(), "[tdc_".to_string()]
}

fn default_ignored_terms() -> Vec<String> {
    vec!["about".to_string()]
}

fn default_ignored_entities() -> Vec<String> {
    vec!["contact".to_string()]
}

/// Per-kind self-link permissions as written in a settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfLinkSettings {
    /// Allow posts to link to themselves
    pub post: bool,
    /// Allow pages to link to themselves
    pub page: bool,
    /// Allow comments to link to their own address
    pub comment: bool,
    /// Allow other entity kinds to link to themselves
    pub other: bool,
}

impl SelfLinkSettings {
    fn to_map(self) -> BTreeMap<EntityKind, bool> {
        BTreeMap::from([
            (EntityKind::Post, self.post),
            (EntityKind::Page, self.page),
            (EntityKind::Comment, self.comment),
            (EntityKind::Other, self.other),
        ])
    }
}

/// Settings as read from a file.
///
/// Every field has a default, so an empty file is valid. Call
/// [`LinkerSettings::validate`] to obtain a [`LinkerConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerSettings {
    /// Maximum anchors inserted per document (0 = unlimited)
    pub max_links_total: usize,
    /// Maximum anchors per term (0 or negative = unlimited)
    pub max_links_per_term: i64,
    /// Maximum anchors per target URL, active only when `max_links_per_term == 1`
    pub max_same_target_url: usize,
    /// Minimum usage count for categories/tags to become candidates
    pub min_usage_threshold: u32,
    /// Match terms case-sensitively
    pub case_sensitive: bool,
    /// Never annotate inside `h1`-`h6`
    pub exclude_headings: bool,
    /// Never annotate inside caption blocks
    pub exclude_captions: bool,
    /// Annotate feed renderings
    pub allow_feed_processing: bool,
    /// Annotate only single-document views
    pub only_single_view: bool,
    /// Per-kind self-link permissions
    pub self_links: SelfLinkSettings,
    /// Never link two terms to the same URL in one document
    pub prevent_duplicate_target: bool,
    /// Add `target="_blank"` to external anchors
    pub add_target_blank_external: bool,
    /// Add `rel="nofollow"` to external anchors
    pub add_nofollow_external: bool,
    /// Terms that are never linked
    pub ignored_terms: Vec<String>,
    /// Entities (id, slug or title) that are never annotated nor linked to
    pub ignored_entities: Vec<String>,
    /// Annotate posts
    pub process_posts: bool,
    /// Annotate pages
    pub process_pages: bool,
    /// Annotate comments
    pub process_comments: bool,
    /// Use post titles as candidates
    pub link_posts: bool,
    /// Use page titles as candidates
    pub link_pages: bool,
    /// Use category names as candidates
    pub link_categories: bool,
    /// Use tag names as candidates
    pub link_tags: bool,
    /// Structured keyword rules
    pub custom_keywords: Vec<KeywordRule>,
    /// Keyword rules in `kw|kw|URL` line form, appended after `custom_keywords`
    pub custom_keywords_text: Option<String>,
    /// The site's own base URL, used to tell internal from external anchors
    pub site_url: Option<String>,
    /// Substrings that mark page-builder content, which is left untouched
    pub page_builder_markers: Vec<String>,
    /// Ceiling on candidates examined per document (0 = unlimited)
    pub max_candidates_scanned: usize,
}

impl Default for LinkerSettings {
    fn default() -> Self {
        Self {
            max_links_total: DEFAULT_MAX_LINKS_TOTAL,
            max_links_per_term: DEFAULT_MAX_LINKS_PER_TERM,
            max_same_target_url: DEFAULT_MAX_SAME_TARGET_URL,
            min_usage_threshold: DEFAULT_MIN_USAGE_THRESHOLD,
            case_sensitive: false,
            exclude_headings: true,
            exclude_captions: true,
            allow_feed_processing: false,
            only_single_view: true,
            self_links: SelfLinkSettings::default(),
            prevent_duplicate_target: false,
            add_target_blank_external: false,
            add_nofollow_external: false,
            ignored_terms: default_ignored_terms(),
            ignored_entities: default_ignored_entities(),
            process_posts: true,
            process_pages: true,
            process_comments: false,
            link_posts: true,
            link_pages: true,
            link_categories: false,
            link_tags: false,
            custom_keywords: Vec::new(),
            custom_keywords_text: None,
            site_url: None,
            page_builder_markers: default_page_builder_markers(),
            max_candidates_scanned: DEFAULT_MAX_CANDIDATES_SCANNED,
        }
    }
}

impl LinkerSettings {
    /// Validate and convert into the immutable engine configuration.
    pub fn validate(self) -> ConfigResult<LinkerConfig> {
        let site_url = match self.site_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(Url::parse(raw).map_err(|e| ConfigError::InvalidSiteUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?),
        };

        let mut custom_keywords = Vec::with_capacity(self.custom_keywords.len());
        for (index, rule) in self.custom_keywords.into_iter().enumerate() {
            let url = rule.url.trim().to_string();
            if url.is_empty() {
                return Err(ConfigError::InvalidKeywordRule {
                    index,
                    reason: "empty url".to_string(),
                });
            }
            let keywords: Vec<String> = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
            if keywords.is_empty() {
                return Err(ConfigError::InvalidKeywordRule {
                    index,
                    reason: "no keywords".to_string(),
                });
            }
            custom_keywords.push(KeywordRule { keywords, url });
        }

        if let Some(text) = self.custom_keywords_text.as_deref() {
            let parsed = parse_keyword_lines(text);
            for skipped in &parsed.skipped {
                warn!(reason = %skipped, "Skipping custom keyword line");
            }
            custom_keywords.extend(parsed.rules);
        }

        Ok(LinkerConfig {
            max_links_total: self.max_links_total,
            max_links_per_term: self.max_links_per_term,
            max_same_target_url: self.max_same_target_url,
            min_usage_threshold: self.min_usage_threshold,
            case_sensitive: self.case_sensitive,
            exclude_headings: self.exclude_headings,
            exclude_captions: self.exclude_captions,
            allow_feed_processing: self.allow_feed_processing,
            only_single_view: self.only_single_view,
            allow_self_link: self.self_links.to_map(),
            prevent_duplicate_target: self.prevent_duplicate_target,
            add_target_blank_external: self.add_target_blank_external,
            add_nofollow_external: self.add_nofollow_external,
            ignored_terms: clean_list(self.ignored_terms),
            ignored_entities: clean_list(self.ignored_entities),
            process_posts: self.process_posts,
            process_pages: self.process_pages,
            process_comments: self.process_comments,
            link_posts: self.link_posts,
            link_pages: self.link_pages,
            link_categories: self.link_categories,
            link_tags: self.link_tags,
            custom_keywords,
            site_url,
            page_builder_markers: self
                .page_builder_markers
                .into_iter()
                .filter(|m| !m.is_empty())
                .collect(),
            max_candidates_scanned: self.max_candidates_scanned,
        })
    }
}

fn clean_list(values: Vec<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Validated, immutable engine configuration.
///
/// Built once at the boundary via [`LinkerSettings::validate`]; downstream
/// code only reads typed fields. `Default` matches the default settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkerConfig {
    /// Maximum anchors inserted per document (0 = unlimited)
    pub max_links_total: usize,
    /// Maximum anchors per term (0 or negative = unlimited)
    pub max_links_per_term: i64,
    /// Maximum anchors per target URL, active only when `max_links_per_term == 1`
    pub max_same_target_url: usize,
    /// Minimum usage count for categories/tags to become candidates
    pub min_usage_threshold: u32,
    /// Match terms case-sensitively
    pub case_sensitive: bool,
    /// Never annotate inside `h1`-`h6`
    pub exclude_headings: bool,
    /// Never annotate inside caption blocks
    pub exclude_captions: bool,
    /// Annotate feed renderings
    pub allow_feed_processing: bool,
    /// Annotate only single-document views
    pub only_single_view: bool,
    /// Per-kind self-link permissions (missing kinds are disallowed)
    pub allow_self_link: BTreeMap<EntityKind, bool>,
    /// Never link two terms to the same URL in one document
    pub prevent_duplicate_target: bool,
    /// Add `target="_blank"` to external anchors
    pub add_target_blank_external: bool,
    /// Add `rel="nofollow"` to external anchors
    pub add_nofollow_external: bool,
    /// Terms that are never linked
    pub ignored_terms: BTreeSet<String>,
    /// Entities (id, slug or title) that are never annotated nor linked to
    pub ignored_entities: BTreeSet<String>,
    /// Annotate posts
    pub process_posts: bool,
    /// Annotate pages
    pub process_pages: bool,
    /// Annotate comments
    pub process_comments: bool,
    /// Use post titles as candidates
    pub link_posts: bool,
    /// Use page titles as candidates
    pub link_pages: bool,
    /// Use category names as candidates
    pub link_categories: bool,
    /// Use tag names as candidates
    pub link_tags: bool,
    /// Operator keyword rules, in priority order
    pub custom_keywords: Vec<KeywordRule>,
    /// The site's own base URL
    pub site_url: Option<Url>,
    /// Substrings that mark page-builder content
    pub page_builder_markers: Vec<String>,
    /// Ceiling on candidates examined per document (0 = unlimited)
    pub max_candidates_scanned: usize,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        LinkerSettings::default()
            .validate()
            .unwrap_or_else(|_| unreachable!("default settings are valid"))
    }
}

impl LinkerConfig {
    /// Total anchor budget, `None` when unlimited
    pub fn total_limit(&self) -> Option<usize> {
        (self.max_links_total > 0).then_some(self.max_links_total)
    }

    /// Per-term anchor budget, `None` when unlimited
    pub fn per_term_limit(&self) -> Option<usize> {
        (self.max_links_per_term > 0).then(|| self.max_links_per_term as usize)
    }

    /// Per-URL anchor budget; only active when the per-term budget is exactly 1
    pub fn same_target_limit(&self) -> Option<usize> {
        (self.max_links_per_term == 1 && self.max_same_target_url > 0)
            .then_some(self.max_same_target_url)
    }

    /// Candidate ceiling, `None` when unlimited
    pub fn candidate_ceiling(&self) -> Option<usize> {
        (self.max_candidates_scanned > 0).then_some(self.max_candidates_scanned)
    }

    /// Whether documents of `kind` may link to themselves
    pub fn allows_self_link(&self, kind: EntityKind) -> bool {
        self.allow_self_link.get(&kind).copied().unwrap_or(false)
    }

    /// Whether documents of `kind` are annotated at all
    pub fn processes(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Post => self.process_posts,
            EntityKind::Page => self.process_pages,
            EntityKind::Comment => self.process_comments,
            EntityKind::Other => true,
        }
    }

    /// Whether `term` is on the ignore list, honouring `case_sensitive`
    pub fn is_term_ignored(&self, term: &str) -> bool {
        let term = term.trim();
        if self.case_sensitive {
            self.ignored_terms.contains(term)
        } else {
            self.ignored_terms
                .iter()
                .any(|ignored| ignored.to_lowercase() == term.to_lowercase())
        }
    }

    /// Whether an entity key (id, slug or title) is on the ignore list.
    /// Always compared case-insensitively.
    pub fn is_entity_ignored(&self, key: &str) -> bool {
        let key = key.trim();
        !key.is_empty()
            && self
                .ignored_entities
                .iter()
                .any(|ignored| ignored.to_lowercase() == key.to_lowercase())
    }

    /// Host of `site_url`, lowercased
    pub fn site_host(&self) -> Option<String> {
        self.site_url
            .as_ref()
            .and_then(|u| u.host_str())
            .map(|h| h.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_legacy_defaults() {
        let config = LinkerConfig::default();
        assert_eq!(config.max_links_total, 3);
        assert_eq!(config.max_links_per_term, 1);
        assert_eq!(config.max_same_target_url, 1);
        assert!(config.exclude_headings);
        assert!(config.exclude_captions);
        assert!(config.only_single_view);
        assert!(!config.case_sensitive);
        assert!(config.ignored_terms.contains("about"));
        assert!(config.ignored_entities.contains("contact"));
        assert!(!config.allows_self_link(EntityKind::Post));
        assert!(!config.processes(EntityKind::Comment));
    }

    #[test]
    fn test_limits_treat_zero_and_negative_as_unlimited() {
        let mut config = LinkerConfig::default();
        config.max_links_total = 0;
        config.max_links_per_term = -4;
        assert_eq!(config.total_limit(), None);
        assert_eq!(config.per_term_limit(), None);
        assert_eq!(config.same_target_limit(), None);

        config.max_links_per_term = 1;
        config.max_same_target_url = 2;
        assert_eq!(config.per_term_limit(), Some(1));
        assert_eq!(config.same_target_limit(), Some(2));

        config.max_links_per_term = 2;
        assert_eq!(config.same_target_limit(), None);
    }

    #[test]
    fn test_ignored_terms_respect_case_setting() {
        let mut config = LinkerConfig::default();
        assert!(config.is_term_ignored("About"));

        config.case_sensitive = true;
        assert!(!config.is_term_ignored("About"));
        assert!(config.is_term_ignored("about"));
    }

    #[test]
    fn test_validate_rejects_bad_site_url() {
        let settings = LinkerSettings {
            site_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSiteUrl { .. }));
    }

    #[test]
    fn test_validate_rejects_rule_without_url() {
        let settings = LinkerSettings {
            custom_keywords: vec![KeywordRule::new(["rust"], "  ")],
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKeywordRule { index: 0, .. }));
    }

    #[test]
    fn test_validate_appends_keyword_text_after_rules() {
        let settings = LinkerSettings {
            custom_keywords: vec![KeywordRule::new(["rust"], "/rust")],
            custom_keywords_text: Some("go|golang|/go\nbroken line".to_string()),
            ..Default::default()
        };
        let config = settings.validate().unwrap();
        assert_eq!(config.custom_keywords.len(), 2);
        assert_eq!(config.custom_keywords[1].keywords, vec!["go", "golang"]);
    }

    #[test]
    fn test_validate_cleans_lists_and_reads_site_host() {
        let settings = LinkerSettings {
            ignored_terms: vec!["  ".to_string(), " Foo ".to_string()],
            site_url: Some("https://Example.COM/blog/".to_string()),
            ..Default::default()
        };
        let config = settings.validate().unwrap();
        assert_eq!(config.ignored_terms.len(), 1);
        assert!(config.ignored_terms.contains("Foo"));
        assert_eq!(config.site_host().as_deref(), Some("example.com"));
    }
}
