//! Self-link remover
//!
//! Final pass: unwraps every anchor that points at the document being
//! rendered, whoever inserted it.

use crate::html::{attribute_value, ANCHOR_ELEMENT};
use crate::types::DocumentContext;
use crate::urls::{percent_decode, permalink_variants, same_document};
use interlink_config::LinkerConfig;
use std::borrow::Cow;
use tracing::debug;

/// Replace anchors targeting the document's own permalink with their inner
/// text, unless self-links are allowed for the document's kind
pub fn remove_self_links<'t>(
    text: &'t str,
    config: &LinkerConfig,
    context: &DocumentContext,
) -> Cow<'t, str> {
    if config.allows_self_link(context.entity_kind) {
        return Cow::Borrowed(text);
    }
    let Some(permalink) = context.permalink.as_deref().filter(|p| !p.trim().is_empty()) else {
        return Cow::Borrowed(text);
    };
    let variants = permalink_variants(permalink);

    let targets_self = |href: &str| {
        let href = href.trim();
        if href.is_empty() {
            return false;
        }
        variants.iter().any(|v| v == href || *v == percent_decode(href))
            || same_document(href, permalink)
    };

    let mut removed = 0usize;
    let out = ANCHOR_ELEMENT.replace_all(text, |caps: &regex::Captures<'_>| {
        let open_tag = format!("<a{}>", &caps[1]);
        match attribute_value(&open_tag, "href") {
            Some(href) if targets_self(&href) => {
                removed += 1;
                caps[2].to_string()
            }
            _ => caps[0].to_string(),
        }
    });

    if removed > 0 {
        debug!(removed, permalink, "self-links unwrapped");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use interlink_config::EntityKind;

    fn context() -> DocumentContext {
        DocumentContext::single(EntityKind::Page, "7", "https://example.com/about-us/")
    }

    #[test]
    fn test_unwraps_every_spelling_of_the_permalink() {
        let text = concat!(
            r#"<a href="https://example.com/about-us/">one</a> "#,
            r#"<a href="http://example.com/about-us">two</a> "#,
            r#"<a href=" https://example.com/about%2Dus/ ">three</a> "#,
            r#"<a href="/about-us/">four</a> "#,
            r#"<a href="https://example.com/other/">keep</a>"#,
        );
        let out = remove_self_links(text, &LinkerConfig::default(), &context());
        assert_eq!(
            out,
            r#"one two three four <a href="https://example.com/other/">keep</a>"#
        );
    }

    #[test]
    fn test_allowed_self_links_are_kept() {
        let mut config = LinkerConfig::default();
        config.allow_self_link.insert(EntityKind::Page, true);
        let text = r#"<a href="https://example.com/about-us/">me</a>"#;
        assert_eq!(remove_self_links(text, &config, &context()), text);
    }

    #[test]
    fn test_fragments_and_empty_hrefs_are_kept() {
        let text = r##"<a href="#top">top</a> <a href="">empty</a> <a name="x">named</a>"##;
        assert_eq!(remove_self_links(text, &LinkerConfig::default(), &context()), text);
    }

    #[test]
    fn test_no_permalink_is_a_no_op() {
        let text = r#"<a href="https://example.com/about-us/">me</a>"#;
        let ctx = DocumentContext::default();
        assert!(matches!(
            remove_self_links(text, &LinkerConfig::default(), &ctx),
            Cow::Borrowed(_)
        ));
    }
}
