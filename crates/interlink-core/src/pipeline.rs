//! The full per-document pipeline
//!
//! `scan -> annotate -> restore -> decorate -> remove_self_links`, preceded
//! by the gating rules that decide whether a document is touched at all.
//! Nothing in here can fail: every degraded step falls back to the text it
//! was given.

use crate::annotate::annotate;
use crate::decorate::decorate_external_links;
use crate::error::ScanError;
use crate::protect::{restore_with_zones, scan};
use crate::self_links::remove_self_links;
use crate::types::{AnnotationState, CandidateCatalog, DocumentContext};
use interlink_config::{EntityKind, LinkerConfig};
use std::fmt;
use tracing::{debug, warn};

/// Why a document was returned untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Nothing but whitespace
    EmptyText,
    /// Feed rendering with feed processing disabled
    Feed,
    /// Not a single-document view
    NotSingleView,
    /// Processing is switched off for this kind of document
    KindDisabled(EntityKind),
    /// Page-builder content
    PageBuilder(String),
    /// The entity is on the ignore list
    EntityIgnored(String),
    /// The text contains placeholder sentinels
    SentinelCollision(usize),
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::EmptyText => write!(f, "empty text"),
            Gate::Feed => write!(f, "feed rendering"),
            Gate::NotSingleView => write!(f, "not a single view"),
            Gate::KindDisabled(kind) => write!(f, "processing disabled for {}", kind),
            Gate::PageBuilder(marker) => write!(f, "page-builder marker '{}'", marker),
            Gate::EntityIgnored(key) => write!(f, "entity '{}' is ignored", key),
            Gate::SentinelCollision(at) => write!(f, "placeholder sentinel at byte {}", at),
        }
    }
}

/// Result of processing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// The processed text
    pub text: String,
    /// Anchors inserted by the annotator
    pub links_inserted: usize,
    /// Set when the document was returned untouched
    pub gate: Option<Gate>,
}

impl DocumentOutcome {
    fn untouched(text: &str, gate: Gate) -> Self {
        debug!(reason = %gate, "document left untouched");
        Self {
            text: text.to_string(),
            links_inserted: 0,
            gate: Some(gate),
        }
    }
}

/// Annotate one document. Always returns a string; see [`process_document`]
/// for the details of what happened.
pub fn annotate_document(
    text: &str,
    is_comment: bool,
    context: &DocumentContext,
    catalog: &CandidateCatalog,
    config: &LinkerConfig,
) -> String {
    process_document(text, is_comment, context, catalog, config).text
}

/// Annotate one document and report the outcome
pub fn process_document(
    text: &str,
    is_comment: bool,
    context: &DocumentContext,
    catalog: &CandidateCatalog,
    config: &LinkerConfig,
) -> DocumentOutcome {
    if let Some(gate) = gate(text, is_comment, context, config) {
        return DocumentOutcome::untouched(text, gate);
    }

    let (masked, table) = match scan(text, config) {
        Ok(scanned) => scanned,
        Err(ScanError::SentinelCollision(at)) => {
            warn!(at, "input contains placeholder sentinels, returning it unchanged");
            return DocumentOutcome::untouched(text, Gate::SentinelCollision(at));
        }
    };

    let mut state = AnnotationState::new();
    let (annotated, links_inserted) = annotate(&masked, catalog, config, context, &mut state);

    let (restored, zones) = restore_with_zones(&annotated, &table);
    let decorated = decorate_external_links(&restored, config, context, &zones);
    let text = remove_self_links(&decorated, config, context).into_owned();

    debug!(
        links_inserted,
        entity = context.entity_id.as_deref().unwrap_or("-"),
        "document annotated"
    );
    DocumentOutcome {
        text,
        links_inserted,
        gate: None,
    }
}

fn gate(
    text: &str,
    is_comment: bool,
    context: &DocumentContext,
    config: &LinkerConfig,
) -> Option<Gate> {
    if text.trim().is_empty() {
        return Some(Gate::EmptyText);
    }
    if context.is_feed && !config.allow_feed_processing {
        return Some(Gate::Feed);
    }
    if config.only_single_view && !context.is_single_view {
        return Some(Gate::NotSingleView);
    }

    let kind = if is_comment || context.is_comment {
        EntityKind::Comment
    } else {
        context.entity_kind
    };
    if !config.processes(kind) {
        return Some(Gate::KindDisabled(kind));
    }

    if let Some(marker) = config
        .page_builder_markers
        .iter()
        .find(|m| !m.is_empty() && text.contains(m.as_str()))
    {
        return Some(Gate::PageBuilder(marker.clone()));
    }

    context
        .identity_keys()
        .find(|key| config.is_entity_ignored(key))
        .map(|key| Gate::EntityIgnored(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CandidateKind, LinkCandidate};

    fn catalog() -> CandidateCatalog {
        CandidateCatalog::from_lists(
            vec![],
            vec![LinkCandidate::new("python", "https://example.com/python/", CandidateKind::Post, Some("9".into()), 0)],
            vec![],
            vec![],
        )
    }

    fn context() -> DocumentContext {
        DocumentContext::single(EntityKind::Post, "1", "https://example.com/post/")
    }

    #[test]
    fn test_full_pipeline_links_paragraph_not_heading() {
        let text = "<h2>Python Guide</h2><p>python is great</p>";
        let outcome = process_document(text, false, &context(), &catalog(), &LinkerConfig::default());

        assert_eq!(outcome.links_inserted, 1);
        assert_eq!(
            outcome.text,
            r#"<h2>Python Guide</h2><p><a title="python" href="https://example.com/python/">python</a> is great</p>"#
        );
    }

    #[test]
    fn test_gates() {
        let config = LinkerConfig::default();
        let cases = [
            ("   ", context(), false, Gate::EmptyText),
            ("python", DocumentContext { is_feed: true, ..context() }, false, Gate::Feed),
            ("python", DocumentContext { is_single_view: false, ..context() }, false, Gate::NotSingleView),
            ("python", context(), true, Gate::KindDisabled(EntityKind::Comment)),
            ("[vc_row]python[/vc_row]", context(), false, Gate::PageBuilder("[vc_".into())),
            (
                "python",
                DocumentContext { entity_slug: Some("Contact".into()), ..context() },
                false,
                Gate::EntityIgnored("Contact".into()),
            ),
        ];

        for (text, ctx, is_comment, expected) in cases {
            let outcome = process_document(text, is_comment, &ctx, &catalog(), &config);
            assert_eq!(outcome.gate, Some(expected));
            assert_eq!(outcome.text, text);
        }
    }

    #[test]
    fn test_sentinel_collision_returns_input() {
        let text = "python \u{E000}";
        let outcome = process_document(text, false, &context(), &catalog(), &LinkerConfig::default());
        assert_eq!(outcome.text, text);
        assert_eq!(outcome.gate, Some(Gate::SentinelCollision(7)));
    }

    #[test]
    fn test_existing_self_link_is_unwrapped() {
        let text = r#"see <a href="https://example.com/post">this post</a>"#;
        let out = annotate_document(text, false, &context(), &CandidateCatalog::default(), &LinkerConfig::default());
        assert_eq!(out, "see this post");
    }
}
