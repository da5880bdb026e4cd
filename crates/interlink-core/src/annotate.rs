//! Matcher/annotator: wraps candidate terms found in masked text in anchors
//!
//! Candidates are tried in catalog order (custom keywords, content,
//! categories, tags; longest term first within a group) until the document
//! budget is spent. Every accepted match is spliced in immediately, so later
//! candidates see, and cannot match inside, earlier anchors.

use crate::html::{escape_attr, is_word_char};
use crate::protect::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};
use crate::ranges::ClaimedRanges;
use crate::types::{AnnotationState, CandidateCatalog, CandidateKind, DocumentContext, LinkCandidate};
use crate::urls::{normalize_url, resolve_against, same_document};
use interlink_config::LinkerConfig;
use regex::{Regex, RegexBuilder};
use std::ops::Range;
use tracing::{debug, trace};
use url::Url;

/// Why a candidate was passed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Absent,
    SelfLink,
    DuplicateTarget,
    TargetCap,
    TermCap,
}

/// Insert anchors into `masked` for the candidates of `catalog`.
///
/// Returns the annotated text and the number of anchors inserted by this
/// call. `state` accumulates across calls that share it.
pub fn annotate(
    masked: &str,
    catalog: &CandidateCatalog,
    config: &LinkerConfig,
    context: &DocumentContext,
    state: &mut AnnotationState,
) -> (String, usize) {
    let mut annotator = Annotator::new(masked, config, context);

    for candidate in catalog.iter() {
        if let Some(limit) = config.total_limit() {
            if state.total_inserted >= limit {
                debug!(limit, "document link budget spent");
                break;
            }
        }
        if is_filtered(candidate, config) {
            continue;
        }
        if let Some(ceiling) = config.candidate_ceiling() {
            if annotator.examined >= ceiling {
                debug!(ceiling, "candidate ceiling reached");
                break;
            }
        }
        annotator.examined += 1;

        match annotator.try_candidate(candidate, state) {
            Ok(0) => {}
            Ok(inserted) => {
                trace!(term = %candidate.term, inserted, "linked");
            }
            Err(Skip::Absent) => {}
            Err(reason) => {
                debug!(term = %candidate.term, url = %candidate.target_url, ?reason, "candidate skipped");
            }
        }
    }

    (annotator.text, annotator.inserted)
}

/// Candidates dropped before any work is done; these never count toward
/// the candidate ceiling
fn is_filtered(candidate: &LinkCandidate, config: &LinkerConfig) -> bool {
    let term = candidate.term.trim();
    let target = candidate.target_url.trim();

    term.is_empty()
        || target.is_empty()
        || config.is_term_ignored(term)
        || (candidate.kind != CandidateKind::CustomKeyword && config.is_entity_ignored(term))
        || candidate
            .source_id
            .as_deref()
            .is_some_and(|id| config.is_entity_ignored(id))
        || [term, target]
            .iter()
            .any(|s| s.contains([PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE]))
}

struct Annotator<'a> {
    text: String,
    /// Lowercased copy of the input for the containment probe
    probe_text: String,
    claimed: ClaimedRanges,
    config: &'a LinkerConfig,
    context: &'a DocumentContext,
    base: Option<Url>,
    examined: usize,
    inserted: usize,
}

impl<'a> Annotator<'a> {
    fn new(masked: &str, config: &'a LinkerConfig, context: &'a DocumentContext) -> Self {
        let probe_text = if config.case_sensitive {
            masked.to_string()
        } else {
            masked.to_lowercase()
        };
        Self {
            text: masked.to_string(),
            probe_text,
            claimed: ClaimedRanges::from_text(masked),
            config,
            context,
            base: context
                .permalink
                .as_deref()
                .and_then(|p| Url::parse(p.trim()).ok()),
            examined: 0,
            inserted: 0,
        }
    }

    fn term_key(&self, term: &str) -> String {
        if self.config.case_sensitive {
            term.to_string()
        } else {
            term.to_lowercase()
        }
    }

    fn is_self_link(&self, candidate: &LinkCandidate) -> bool {
        if self.config.allows_self_link(self.context.entity_kind) {
            return false;
        }
        let same_entity = candidate.kind.is_content()
            && candidate.source_id.is_some()
            && candidate.source_id == self.context.entity_id;
        let same_address = self
            .context
            .permalink
            .as_deref()
            .is_some_and(|permalink| same_document(&candidate.target_url, permalink));
        same_entity || same_address
    }

    fn try_candidate(
        &mut self,
        candidate: &LinkCandidate,
        state: &mut AnnotationState,
    ) -> Result<usize, Skip> {
        let term = candidate.term.trim();

        if !self.probe_text.contains(&self.term_key(term)) {
            return Err(Skip::Absent);
        }

        if self.is_self_link(candidate) {
            return Err(Skip::SelfLink);
        }

        let url_key = normalize_url(&resolve_against(self.base.as_ref(), &candidate.target_url));
        if self.config.prevent_duplicate_target && state.used_target_urls.contains(&url_key) {
            return Err(Skip::DuplicateTarget);
        }
        // Operator keywords are only bound by duplicate-target prevention
        let metered = candidate.kind != CandidateKind::CustomKeyword;
        if let Some(cap) = self.config.same_target_limit().filter(|_| metered) {
            if state.url_count(&url_key) >= cap {
                return Err(Skip::TargetCap);
            }
        }

        let term_key = self.term_key(term);
        let mut allowed = usize::MAX;
        if let Some(limit) = self.config.per_term_limit() {
            let used = state.per_term_count.get(&term_key).copied().unwrap_or(0);
            allowed = limit.saturating_sub(used);
        }
        if let Some(limit) = self.config.total_limit() {
            allowed = allowed.min(limit.saturating_sub(state.total_inserted));
        }
        if allowed == 0 {
            return Err(Skip::TermCap);
        }

        let Some(matcher) = self.matcher(term) else {
            return Err(Skip::Absent);
        };
        let found = self.find_matches(&matcher, allowed);
        if found.is_empty() {
            return Ok(0);
        }

        self.splice(candidate, &found);
        state.record(&term_key, &url_key, found.len(), metered);
        self.inserted += found.len();
        Ok(found.len())
    }

    fn matcher(&self, term: &str) -> Option<Regex> {
        RegexBuilder::new(&regex::escape(term))
            .case_insensitive(!self.config.case_sensitive)
            .build()
            .map_err(|e| debug!(term, error = %e, "term pattern rejected"))
            .ok()
    }

    /// Up to `allowed` unclaimed, word-bounded matches, in text order
    fn find_matches(&self, matcher: &Regex, allowed: usize) -> Vec<Range<usize>> {
        let text = self.text.as_str();
        let mut found = Vec::new();
        let mut pos = 0;

        while found.len() < allowed {
            let Some(m) = matcher.find_at(text, pos) else {
                break;
            };
            let range = m.range();

            if m.is_empty() {
                break;
            }
            if self.claimed.overlaps(&range) {
                trace!(at = range.start, "match inside claimed range");
            } else if !is_word_bounded(text, &range) {
                trace!(at = range.start, "match not on a word boundary");
            } else {
                pos = range.end;
                found.push(range);
                continue;
            }

            // Retry one character further on
            pos = range.start + text[range.start..].chars().next().map_or(1, char::len_utf8);
        }
        found
    }

    /// Wrap each of `found` in an anchor, last first so earlier offsets hold
    fn splice(&mut self, candidate: &LinkCandidate, found: &[Range<usize>]) {
        for range in found.iter().rev() {
            let anchor = anchor_markup(candidate, &self.text[range.clone()]);
            self.text.replace_range(range.clone(), &anchor);
            self.claimed.splice(range.start, range.len(), anchor.len());
        }
    }
}

/// Check both ends of a match whose edge characters are word characters
fn is_word_bounded(text: &str, range: &Range<usize>) -> bool {
    let matched = &text[range.clone()];

    let starts_word = matched.chars().next().is_some_and(is_word_char);
    if starts_word && text[..range.start].chars().next_back().is_some_and(is_word_char) {
        return false;
    }

    let ends_word = matched.chars().next_back().is_some_and(is_word_char);
    if ends_word && text[range.end..].chars().next().is_some_and(is_word_char) {
        return false;
    }
    true
}

fn anchor_markup(candidate: &LinkCandidate, matched: &str) -> String {
    let href = escape_attr(candidate.target_url.trim());
    match candidate.kind {
        CandidateKind::CustomKeyword => format!(r#"<a href="{}">{}</a>"#, href, matched),
        _ => format!(
            r#"<a title="{}" href="{}">{}</a>"#,
            escape_attr(candidate.term.trim()),
            href,
            matched
        ),
    }
}
