//! Protection scanner and restorer
//!
//! Spans that must never receive anchors are swapped for opaque placeholder
//! tokens before matching, and put back verbatim afterwards:
//!
//! 1. caption blocks (`[caption]...[/caption]`, `<figcaption>`), when
//!    `exclude_captions` is set
//! 2. `alt`, `title` and `data-*` attribute pairs, always
//! 3. heading contents (`h1`-`h6`), when `exclude_headings` is set
//!
//! Each stage only sees what earlier stages left visible. A token is
//! `U+E000 <index> U+E001`; it contains no markup characters, so later
//! stages and the matcher treat it as plain, claimed text.

use crate::error::ScanError;
use crate::html::{parse_attributes, MARKUP};
use interlink_config::LinkerConfig;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::trace;

/// Opening sentinel of a placeholder token
pub const PLACEHOLDER_OPEN: char = '\u{E000}';

/// Closing sentinel of a placeholder token
pub const PLACEHOLDER_CLOSE: char = '\u{E001}';

pub(crate) static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").expect("placeholder regex"));

static CAPTION_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[caption\b[^\]]*\]").expect("caption open regex"));

static CAPTION_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[/caption\]").expect("caption close regex"));

static FIGCAPTION_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<figcaption\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("figcaption open regex")
});

static FIGCAPTION_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</figcaption\s*>").expect("figcaption close regex"));

static HEADING_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<h([1-6])\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("heading open regex")
});

static HEADING_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</h([1-6])\s*>").expect("heading close regex"));

/// What a protected zone contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    /// A whole caption block
    Caption,
    /// An `alt`/`title`/`data-*` attribute pair
    Attribute,
    /// The contents of a heading element
    Heading,
}

/// A half-open byte range that must not be searched or mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedZone {
    /// What the zone contains
    pub kind: ZoneKind,
    /// Byte range in the text the zone was reported for
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MaskedSpan {
    kind: ZoneKind,
    content: String,
}

/// Everything needed to undo a [`scan`].
///
/// Token `n` stands for the `n`th masked span. A span's stored content can
/// only reference tokens with smaller indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestorationTable {
    spans: Vec<MaskedSpan>,
    zones: Vec<ProtectedZone>,
}

impl RestorationTable {
    /// Number of masked spans
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether nothing was masked
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Protected zones in original-text coordinates
    pub fn zones(&self) -> &[ProtectedZone] {
        &self.zones
    }

    /// Replace `ranges` of `text` (sorted, disjoint) with fresh tokens
    fn mask(&mut self, text: &str, kind: ZoneKind, ranges: Vec<Range<usize>>) -> String {
        if ranges.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for range in ranges {
            out.push_str(&text[last..range.start]);
            out.push(PLACEHOLDER_OPEN);
            out.push_str(&self.spans.len().to_string());
            out.push(PLACEHOLDER_CLOSE);
            self.spans.push(MaskedSpan {
                kind,
                content: text[range.clone()].to_string(),
            });
            last = range.end;
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Mask every protected span of `text`.
///
/// Fails only when `text` already contains a placeholder sentinel.
pub fn scan(text: &str, config: &LinkerConfig) -> Result<(String, RestorationTable), ScanError> {
    if let Some(at) = text.find([PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE]) {
        return Err(ScanError::SentinelCollision(at));
    }

    let mut table = RestorationTable::default();
    let mut masked = text.to_string();

    if config.exclude_captions {
        for (open, close) in [
            (&*CAPTION_OPEN, &*CAPTION_CLOSE),
            (&*FIGCAPTION_OPEN, &*FIGCAPTION_CLOSE),
        ] {
            // Each round masks at least one opening tag, so nesting unwinds
            // from the inside out
            loop {
                let ranges = innermost_blocks(&masked, open, close);
                if ranges.is_empty() {
                    break;
                }
                masked = table.mask(&masked, ZoneKind::Caption, ranges);
            }
        }
    }

    let ranges = attribute_ranges(&masked);
    masked = table.mask(&masked, ZoneKind::Attribute, ranges);

    if config.exclude_headings {
        let ranges = heading_content_ranges(&masked);
        masked = table.mask(&masked, ZoneKind::Heading, ranges);
    }

    let (_, zones) = restore_with_zones(&masked, &table);
    table.zones = zones;
    Ok((masked, table))
}

/// Put every masked span back
pub fn restore(text: &str, table: &RestorationTable) -> String {
    restore_with_zones(text, table).0
}

/// Put every masked span back and report where each one landed.
///
/// Zones are sorted by start; a heading zone can contain attribute zones.
pub fn restore_with_zones(text: &str, table: &RestorationTable) -> (String, Vec<ProtectedZone>) {
    let mut out = String::with_capacity(text.len());
    let mut zones = Vec::with_capacity(table.spans.len());
    expand_into(text, table, table.spans.len(), &mut out, &mut zones);
    zones.sort_by_key(|z| (z.range.start, std::cmp::Reverse(z.range.end)));
    (out, zones)
}

/// Expand tokens below `limit`, recursively. Stored content only refers to
/// older tokens, so lowering the limit at each level guarantees termination.
fn expand_into(
    text: &str,
    table: &RestorationTable,
    limit: usize,
    out: &mut String,
    zones: &mut Vec<ProtectedZone>,
) {
    let mut last = 0;
    for cap in PLACEHOLDER.captures_iter(text) {
        let Some(token) = cap.get(0) else { continue };
        out.push_str(&text[last..token.start()]);
        last = token.end();

        let index = cap[1].parse::<usize>().ok().filter(|i| *i < limit);
        match index.and_then(|i| table.spans.get(i).map(|s| (i, s))) {
            Some((i, span)) => {
                let start = out.len();
                expand_into(&span.content, table, i, out, zones);
                zones.push(ProtectedZone {
                    kind: span.kind,
                    range: start..out.len(),
                });
            }
            None => {
                trace!(token = %token.as_str().escape_unicode(), "unknown placeholder left as is");
                out.push_str(token.as_str());
            }
        }
    }
    out.push_str(&text[last..]);
}

/// Blocks from an `open` tag to the first following `close` tag with no
/// other `open` tag in between
fn innermost_blocks(text: &str, open: &Regex, close: &Regex) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut cursor = 0;

    while let Some(start) = open.find_at(text, cursor) {
        let Some(end) = close.find_at(text, start.end()) else {
            break;
        };
        match open.find_at(text, start.end()) {
            Some(nested) if nested.start() < end.start() => cursor = nested.start(),
            _ => {
                ranges.push(start.start()..end.end());
                cursor = end.end();
            }
        }
    }
    ranges
}

fn is_protected_attribute(name: &str) -> bool {
    name == "alt" || name == "title" || name.starts_with("data-")
}

/// Whole `name="value"` pairs of protected attributes, in text coordinates
fn attribute_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    for tag in MARKUP.find_iter(text) {
        let raw = tag.as_str();
        if raw.starts_with("<!") || raw.starts_with("</") {
            continue;
        }
        for attr in parse_attributes(raw) {
            if attr.value_span.is_some() && is_protected_attribute(&attr.name) {
                ranges.push(tag.start() + attr.span.start..tag.start() + attr.span.end);
            }
        }
    }
    ranges
}

/// Contents of `hN` elements closed at the same level. Unterminated
/// headings are left unprotected.
fn heading_content_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut cursor = 0;

    while let Some(open) = HEADING_OPEN.captures_at(text, cursor) {
        let (Some(whole), Some(level)) = (open.get(0), open.get(1)) else {
            break;
        };
        let content_start = whole.end();

        let close = HEADING_CLOSE
            .captures_iter(&text[content_start..])
            .find(|c| c.get(1).map(|m| m.as_str()) == Some(level.as_str()))
            .and_then(|c| c.get(0));

        match close {
            Some(close) => {
                let content_end = content_start + close.start();
                if content_end > content_start {
                    ranges.push(content_start..content_end);
                }
                cursor = content_start + close.end();
            }
            None => {
                trace!(at = whole.start(), level = level.as_str(), "unterminated heading");
                cursor = content_start;
            }
        }
    }
    ranges
}
