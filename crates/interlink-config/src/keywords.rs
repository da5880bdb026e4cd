//! Operator-defined keyword rules
//!
//! The line format is `keyword1|keyword2|...|URL`: the last field is the
//! target, every other non-empty field is a keyword that links to it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A group of keywords that all link to one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Literal terms to link
    pub keywords: Vec<String>,
    /// Link target
    pub url: String,
}

impl KeywordRule {
    /// Create a rule from keywords and a target
    pub fn new<I, S>(keywords: I, url: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            url: url.into(),
        }
    }
}

/// Result of parsing a keyword block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedKeywords {
    /// Rules in line order
    pub rules: Vec<KeywordRule>,
    /// One message per skipped line
    pub skipped: Vec<String>,
}

/// Parse a block of `kw|kw|URL` lines.
///
/// Blank lines are ignored. Lines with fewer than two fields, an empty URL,
/// or no usable keyword are reported in [`ParsedKeywords::skipped`].
pub fn parse_keyword_lines(text: &str) -> ParsedKeywords {
    let mut parsed = ParsedKeywords::default();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts: Vec<&str> = line.split('|').collect();
        if parts.len() < 2 {
            parsed
                .skipped
                .push(format!("line {}: expected 'keyword|url'", line_no + 1));
            continue;
        }

        let url = parts.pop().map(str::trim).unwrap_or_default();
        if url.is_empty() {
            parsed
                .skipped
                .push(format!("line {}: empty url", line_no + 1));
            continue;
        }

        let keywords: Vec<String> = parts
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        if keywords.is_empty() {
            parsed
                .skipped
                .push(format!("line {}: no keywords", line_no + 1));
            continue;
        }

        parsed.rules.push(KeywordRule {
            keywords,
            url: url.to_string(),
        });
    }

    parsed
}

/// Flatten rules into `(keyword, url)` pairs.
///
/// A keyword that appears more than once keeps the position of its first
/// appearance and the URL of its last. Keywords for which `is_ignored`
/// returns true are dropped.
pub fn keyword_targets<F>(rules: &[KeywordRule], is_ignored: F) -> Vec<(String, String)>
where
    F: Fn(&str) -> bool,
{
    let mut order: Vec<(String, String)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for rule in rules {
        for keyword in &rule.keywords {
            let keyword = keyword.trim();
            if keyword.is_empty() || is_ignored(keyword) {
                continue;
            }
            match index.get(keyword) {
                Some(&pos) => order[pos].1 = rule.url.clone(),
                None => {
                    index.insert(keyword.to_string(), order.len());
                    order.push((keyword.to_string(), rule.url.clone()));
                }
            }
        }
    }

    order
}
