//! URL comparison helpers
//!
//! Link targets are compared in a normalized form: percent-decoded, without
//! scheme, with a lowercase host and without trailing slashes. Relative
//! targets are resolved against the document's permalink first.

use std::borrow::Cow;
use url::Url;

/// Percent-decode, falling back to the input when it is not valid UTF-8
pub fn percent_decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Normalized comparison key for a URL.
///
/// `https://Example.com/a%20b/` and `http://example.com/a b` share a key.
pub fn normalize_url(raw: &str) -> String {
    let decoded = percent_decode(raw.trim());
    let mut rest: &str = decoded.as_ref();

    for scheme in ["https://", "http://"] {
        if rest
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        {
            rest = &rest[scheme.len()..];
            break;
        }
    }
    if let Some(stripped) = rest.strip_prefix("//") {
        rest = stripped;
    }

    // Split off query/fragment so trailing-slash trimming only touches the path
    let tail_at = rest.find(['?', '#']).unwrap_or(rest.len());
    let (location, tail) = rest.split_at(tail_at);

    let host_end = location.find('/').unwrap_or(location.len());
    let (host, path) = location.split_at(host_end);
    let is_relative = host.is_empty();

    let mut key = if is_relative {
        String::new()
    } else {
        host.to_ascii_lowercase()
    };
    key.push_str(path.trim_end_matches('/'));
    key.push_str(tail);
    key
}

/// Resolve `target` against `base` when it is relative
pub fn resolve_against(base: Option<&Url>, target: &str) -> String {
    let target = target.trim();
    if let Ok(url) = Url::parse(target) {
        return url.to_string();
    }
    match base {
        Some(base) => base
            .join(target)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| target.to_string()),
        None => target.to_string(),
    }
}

/// Whether `target` points at the same document as `permalink`
pub fn same_document(target: &str, permalink: &str) -> bool {
    let base = Url::parse(permalink.trim()).ok();
    let resolved = resolve_against(base.as_ref(), target);
    normalize_url(&resolved) == normalize_url(permalink)
}

/// Lowercase host of `href`, or `None` for relative, fragment and
/// host-less (`mailto:`) targets
pub fn host_of(href: &str) -> Option<String> {
    let href = href.trim();
    let parsed = if href.starts_with("//") {
        Url::parse(&format!("http:{}", href))
    } else {
        Url::parse(href)
    };
    parsed
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

/// Spellings of a permalink that count as the same address: both schemes,
/// with and without a trailing slash
pub fn permalink_variants(permalink: &str) -> Vec<String> {
    let base = permalink.trim();
    let mut schemes = vec![base.to_string()];
    if let Some(rest) = base.strip_prefix("https://") {
        schemes.push(format!("http://{}", rest));
    } else if let Some(rest) = base.strip_prefix("http://") {
        schemes.push(format!("https://{}", rest));
    }

    let mut variants: Vec<String> = Vec::new();
    for url in schemes {
        let untrailed = url.trim_end_matches('/').to_string();
        let trailed = format!("{}/", untrailed);
        for candidate in [url, trailed, untrailed] {
            if !candidate.is_empty() && !variants.contains(&candidate) {
                variants.push(candidate);
            }
        }
    }
    variants
}
