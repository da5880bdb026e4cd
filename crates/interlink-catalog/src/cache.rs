//! Caching candidate provider
//!
//! Candidate lists are expensive to build (every record, every permalink)
//! and change rarely, so each list is built once and shared as an
//! `Arc<[LinkCandidate]>` until content changes or it grows stale.
//!
//! ## Thread Safety
//!
//! Lists are built outside the lock and swapped in whole, so readers never
//! see a partially built list and never wait on a rebuild.

use crate::source::{ContentSource, ContentStatus, Taxonomy};
use interlink_core::{rank_candidates, CandidateCatalogProvider, CatalogResult, LinkCandidate};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default staleness ceiling for cached lists
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Terms must be longer than this many characters
pub const DEFAULT_MIN_TERM_CHARS: usize = 3;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lists older than this are rebuilt on the next request
    pub ttl: Duration,
    /// Titles and names must be longer than this many characters
    pub min_term_chars: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            min_term_chars: DEFAULT_MIN_TERM_CHARS,
        }
    }
}

/// Content changes that invalidate cached lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "id", rename_all = "snake_case")]
pub enum ContentEvent {
    /// A post or page was created
    ContentCreated(String),
    /// A post or page was edited
    ContentEdited(String),
    /// A post or page was saved
    ContentSaved(String),
    /// A category was created
    CategoryCreated(String),
    /// A category was edited
    CategoryEdited(String),
}

/// Cache counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served from the cache
    pub hits: u64,
    /// Lists built from the source
    pub rebuilds: u64,
    /// Times the cache was purged
    pub invalidations: u64,
}

#[derive(Debug, Clone)]
struct CachedList {
    candidates: Arc<[LinkCandidate]>,
    built_at: Instant,
}

impl CachedList {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.built_at.elapsed() < ttl
    }
}

#[derive(Debug, Default)]
struct CacheState {
    content: Option<CachedList>,
    categories: HashMap<u32, CachedList>,
    tags: HashMap<u32, CachedList>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKey {
    Content,
    Terms(Taxonomy, u32),
}

/// [`CandidateCatalogProvider`] over a [`ContentSource`], with a TTL cache
pub struct CachedCatalogProvider<S> {
    source: S,
    config: CacheConfig,
    state: RwLock<CacheState>,
    stats: Mutex<CacheStats>,
}

impl<S: ContentSource> CachedCatalogProvider<S> {
    /// Wrap `source` with the default cache configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, CacheConfig::default())
    }

    /// Wrap `source` with a custom cache configuration
    pub fn with_config(source: S, config: CacheConfig) -> Self {
        Self {
            source,
            config,
            state: RwLock::new(CacheState::default()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// The wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Purge every cached list
    pub fn invalidate(&self) {
        *self.state.write() = CacheState::default();
        self.stats.lock().invalidations += 1;
        debug!("candidate cache purged");
    }

    /// React to a content change
    pub fn handle_event(&self, event: &ContentEvent) {
        debug!(?event, "content event");
        self.invalidate();
    }

    fn cached(&self, key: ListKey) -> Option<Arc<[LinkCandidate]>> {
        let state = self.state.read();
        let entry = match key {
            ListKey::Content => state.content.as_ref(),
            ListKey::Terms(Taxonomy::Category, min) => state.categories.get(&min),
            ListKey::Terms(Taxonomy::Tag, min) => state.tags.get(&min),
        };
        entry
            .filter(|e| e.is_fresh(self.config.ttl))
            .map(|e| Arc::clone(&e.candidates))
    }

    fn store(&self, key: ListKey, candidates: Arc<[LinkCandidate]>) {
        let entry = CachedList {
            candidates,
            built_at: Instant::now(),
        };
        let mut state = self.state.write();
        match key {
            ListKey::Content => state.content = Some(entry),
            ListKey::Terms(Taxonomy::Category, min) => {
                state.categories.insert(min, entry);
            }
            ListKey::Terms(Taxonomy::Tag, min) => {
                state.tags.insert(min, entry);
            }
        }
    }

    fn get_or_build<F>(&self, key: ListKey, build: F) -> CatalogResult<Arc<[LinkCandidate]>>
    where
        F: FnOnce() -> CatalogResult<Vec<LinkCandidate>>,
    {
        if let Some(hit) = self.cached(key) {
            self.stats.lock().hits += 1;
            return Ok(hit);
        }

        let mut candidates = build().map_err(|e| {
            warn!(?key, error = %e, "content source failed, list not cached");
            e
        })?;
        rank_candidates(&mut candidates);
        let candidates: Arc<[LinkCandidate]> = candidates.into();

        info!(?key, count = candidates.len(), "candidate list rebuilt");
        self.store(key, Arc::clone(&candidates));
        self.stats.lock().rebuilds += 1;
        Ok(candidates)
    }

    fn is_long_enough(&self, term: &str) -> bool {
        term.trim().chars().count() > self.config.min_term_chars
    }

    fn build_content(&self) -> CatalogResult<Vec<LinkCandidate>> {
        let records = self.source.content()?;
        let mut candidates = Vec::with_capacity(records.len());

        for record in records {
            if record.status != ContentStatus::Published || !self.is_long_enough(&record.title) {
                continue;
            }
            let kind = record.kind.into();
            let Some(url) = self.source.resolve(kind, &record.id) else {
                debug!(id = %record.id, "no permalink, skipping");
                continue;
            };
            let order = candidates.len();
            candidates.push(LinkCandidate::new(
                record.title.trim(),
                url,
                kind,
                Some(record.id),
                order,
            ));
        }
        Ok(candidates)
    }

    fn build_terms(&self, taxonomy: Taxonomy, min_usage: u32) -> CatalogResult<Vec<LinkCandidate>> {
        let records = self.source.terms(taxonomy)?;
        let mut candidates = Vec::with_capacity(records.len());

        for record in records {
            if record.usage_count < min_usage || !self.is_long_enough(&record.name) {
                continue;
            }
            let kind = taxonomy.into();
            let Some(url) = self.source.resolve(kind, &record.id) else {
                debug!(id = %record.id, ?taxonomy, "no permalink, skipping");
                continue;
            };
            let order = candidates.len();
            candidates.push(LinkCandidate::new(
                record.name.trim(),
                url,
                kind,
                Some(record.id),
                order,
            ));
        }
        Ok(candidates)
    }
}

impl<S: ContentSource> CandidateCatalogProvider for CachedCatalogProvider<S> {
    fn list_posts_and_pages(&self) -> CatalogResult<Arc<[LinkCandidate]>> {
        self.get_or_build(ListKey::Content, || self.build_content())
    }

    fn list_categories(&self, min_usage: u32) -> CatalogResult<Arc<[LinkCandidate]>> {
        self.get_or_build(ListKey::Terms(Taxonomy::Category, min_usage), || {
            self.build_terms(Taxonomy::Category, min_usage)
        })
    }

    fn list_tags(&self, min_usage: u32) -> CatalogResult<Arc<[LinkCandidate]>> {
        self.get_or_build(ListKey::Terms(Taxonomy::Tag, min_usage), || {
            self.build_terms(Taxonomy::Tag, min_usage)
        })
    }
}
