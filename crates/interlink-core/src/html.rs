//! Lightweight HTML helpers shared by the passes.
//!
//! These are lexical: the engine works on HTML fragments that
//! may be malformed, so nothing here builds a DOM. Anything that does not
//! match is simply left alone.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// A complete anchor element, lazily matched
pub(crate) static ANCHOR_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b((?:[^>"']|"[^"]*"|'[^']*')*)>(.*?)</a\s*>"#)
        .expect("anchor element regex")
});

/// An anchor opening tag
pub(crate) static ANCHOR_OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("anchor open tag regex")
});

/// Any tag or HTML comment
pub(crate) static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|</?[A-Za-z!](?:[^>"']|"[^"]*"|'[^']*')*>"#)
        .expect("markup regex")
});

/// A bracket-delimited shortcode-like token such as `[gallery id="3"]`
pub(crate) static SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]").expect("shortcode regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([^\s=/>"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+)))?"#)
        .expect("attribute regex")
});

/// One attribute inside a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAttribute {
    /// Attribute name, lowercased
    pub name: String,
    /// Unquoted value, if present
    pub value: Option<String>,
    /// Byte range of the whole `name="value"` pair within the tag
    pub span: Range<usize>,
    /// Byte range of the value (without quotes) within the tag
    pub value_span: Option<Range<usize>>,
}

/// Parse the attributes of an opening tag such as `<a href="x" rel='y'>`.
///
/// The tag name is skipped. Unparseable fragments are ignored.
pub fn parse_attributes(tag: &str) -> Vec<TagAttribute> {
    let body_start = tag
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_whitespace() || *c == '>' || *c == '/')
        .map(|(i, _)| i)
        .unwrap_or(tag.len());
    let body_end = tag.rfind('>').unwrap_or(tag.len()).max(body_start);
    let body = &tag[body_start..body_end];

    ATTRIBUTE
        .captures_iter(body)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let name = cap.get(1)?.as_str().to_ascii_lowercase();
            let value = cap.get(2).or_else(|| cap.get(3)).or_else(|| cap.get(4));
            Some(TagAttribute {
                name,
                value: value.map(|m| m.as_str().to_string()),
                span: body_start + whole.start()..body_start + whole.end(),
                value_span: value.map(|m| body_start + m.start()..body_start + m.end()),
            })
        })
        .collect()
}

/// Value of the named attribute
pub fn attribute_value(tag: &str, name: &str) -> Option<String> {
    parse_attributes(tag)
        .into_iter()
        .find(|a| a.name == name)
        .and_then(|a| a.value)
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Word characters for boundary checks
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
