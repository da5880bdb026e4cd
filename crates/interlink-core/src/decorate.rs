//! External-link decorator
//!
//! Adds `target="_blank"` and `rel="nofollow"` to anchors that leave the
//! site, and strips leading whitespace from `href` values.

use crate::html::{parse_attributes, ANCHOR_OPEN_TAG};
use crate::protect::{ProtectedZone, ZoneKind};
use crate::types::DocumentContext;
use crate::urls::host_of;
use interlink_config::LinkerConfig;
use std::borrow::Cow;
use tracing::debug;

/// Decorate every anchor of `text` that does not start inside a heading or
/// caption zone. `zones` are in `text` coordinates.
pub fn decorate_external_links<'t>(
    text: &'t str,
    config: &LinkerConfig,
    context: &DocumentContext,
    zones: &[ProtectedZone],
) -> Cow<'t, str> {
    let wants_decoration = config.add_target_blank_external || config.add_nofollow_external;
    let own_host = if wants_decoration {
        let host = config
            .site_host()
            .or_else(|| context.permalink.as_deref().and_then(host_of));
        if host.is_none() {
            debug!("no site host known, external decoration skipped");
        }
        host
    } else {
        None
    };

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut changed = false;

    for tag in ANCHOR_OPEN_TAG.find_iter(text) {
        if in_frozen_zone(zones, tag.start()) {
            continue;
        }
        let rewritten = rewrite_anchor_tag(tag.as_str(), config, own_host.as_deref());
        if let Cow::Owned(new_tag) = rewritten {
            out.push_str(&text[last..tag.start()]);
            out.push_str(&new_tag);
            last = tag.end();
            changed = true;
        }
    }

    if !changed {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

fn in_frozen_zone(zones: &[ProtectedZone], at: usize) -> bool {
    zones.iter().any(|z| {
        matches!(z.kind, ZoneKind::Heading | ZoneKind::Caption) && z.range.contains(&at)
    })
}

/// One edit inside a tag: replace `len` bytes at `at` with `insert`
struct Edit {
    at: usize,
    len: usize,
    insert: String,
}

fn rewrite_anchor_tag<'t>(
    tag: &'t str,
    config: &LinkerConfig,
    own_host: Option<&str>,
) -> Cow<'t, str> {
    let attrs = parse_attributes(tag);
    let mut edits: Vec<Edit> = Vec::new();

    let href = attrs.iter().find(|a| a.name == "href");
    if let Some(span) = href.and_then(|a| a.value_span.clone()) {
        let value = &tag[span.clone()];
        let leading = value.len() - value.trim_start().len();
        if leading > 0 {
            edits.push(Edit {
                at: span.start,
                len: leading,
                insert: String::new(),
            });
        }
    }

    let href_host = href
        .and_then(|a| a.value.as_deref())
        .and_then(host_of);
    let is_external = match (own_host, href_host.as_deref()) {
        (Some(own), Some(host)) => !own.eq_ignore_ascii_case(host),
        _ => false,
    };

    if is_external {
        let close_at = tag
            .strip_suffix("/>")
            .map(|t| t.trim_end().len())
            .unwrap_or_else(|| tag.len() - 1);
        let mut appended = String::new();

        if config.add_nofollow_external {
            let rel = attrs.iter().find(|a| a.name == "rel");
            match rel.and_then(|a| a.value_span.clone().zip(a.value.as_deref())) {
                Some((span, value)) => {
                    let has_nofollow = value
                        .split_ascii_whitespace()
                        .any(|t| t.eq_ignore_ascii_case("nofollow"));
                    if !has_nofollow {
                        let insert = if value.trim().is_empty() {
                            "nofollow".to_string()
                        } else {
                            " nofollow".to_string()
                        };
                        edits.push(Edit {
                            at: span.end,
                            len: 0,
                            insert,
                        });
                    }
                }
                None => appended.push_str(r#" rel="nofollow""#),
            }
        }

        if config.add_target_blank_external && !attrs.iter().any(|a| a.name == "target") {
            appended.push_str(r#" target="_blank""#);
        }

        if !appended.is_empty() {
            edits.push(Edit {
                at: close_at,
                len: 0,
                insert: appended,
            });
        }
    }

    if edits.is_empty() {
        return Cow::Borrowed(tag);
    }

    edits.sort_by_key(|e| std::cmp::Reverse(e.at));
    let mut out = tag.to_string();
    for edit in edits {
        out.replace_range(edit.at..edit.at + edit.len, &edit.insert);
    }
    Cow::Owned(out)
}
