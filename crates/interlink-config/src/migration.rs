//! Migration from the legacy flat option map.
//!
//! Legacy installs stored every option under a short string key, with
//! checkboxes as `"on"`/`""` and lists as `|`-separated strings.

use crate::config::{LinkerSettings, DEFAULT_MAX_LINKS_PER_TERM, DEFAULT_MAX_LINKS_TOTAL};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

/// Legacy option map, as exported from the old settings store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacyOptions(pub BTreeMap<String, Value>);

impl LegacyOptions {
    /// Wrap an existing map
    pub fn new(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }

    /// Parse from a JSON object
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Outcome of a migration
#[derive(Debug, Clone)]
pub struct MigrationReport {
    /// Informational messages
    pub info: Vec<String>,
    /// Options that could not be carried over
    pub warnings: Vec<String>,
    /// The migrated settings
    pub settings: LinkerSettings,
}

/// Converts legacy options into [`LinkerSettings`]
pub struct ConfigMigrator;

impl ConfigMigrator {
    /// Migrate a legacy option map.
    ///
    /// Keys missing from the map keep their [`LinkerSettings`] defaults.
    pub fn migrate(legacy: &LegacyOptions) -> MigrationReport {
        let mut settings = LinkerSettings::default();
        let mut report_info = Vec::new();
        let mut warnings = Vec::new();

        for (key, value) in &legacy.0 {
            match key.as_str() {
                "post" => settings.process_posts = truthy(value),
                "page" => settings.process_pages = truthy(value),
                "comment" => settings.process_comments = truthy(value),
                "postself" => settings.self_links.post = truthy(value),
                "pageself" => settings.self_links.page = truthy(value),
                "excludeheading" => settings.exclude_headings = truthy(value),
                "excludefigcaption" => settings.exclude_captions = truthy(value),
                "lposts" => settings.link_posts = truthy(value),
                "lpages" => settings.link_pages = truthy(value),
                "lcats" => settings.link_categories = truthy(value),
                "ltags" => settings.link_tags = truthy(value),
                "onlysingle" => settings.only_single_view = truthy(value),
                "casesens" => settings.case_sensitive = truthy(value),
                "allowfeed" => settings.allow_feed_processing = truthy(value),
                "nofolo" => settings.add_nofollow_external = truthy(value),
                "blanko" => settings.add_target_blank_external = truthy(value),
                "customkey_preventduplicatelink" => {
                    settings.prevent_duplicate_target = truthy(value)
                }
                "ignore" => settings.ignored_terms = pipe_list(value),
                "ignorepost" => settings.ignored_entities = pipe_list(value),
                "customkey" => {
                    let text = as_text(value);
                    settings.custom_keywords_text = (!text.trim().is_empty()).then_some(text);
                }
                "maxlinks" | "maxsingle" => {
                    let Some(n) = intval(value) else {
                        warnings.push(format!("'{}' is not a number: {}", key, value));
                        continue;
                    };
                    // The legacy engine reads zero and negative budgets as its defaults
                    let budget = if key == "maxlinks" {
                        let budget = if n > 0 { n } else { DEFAULT_MAX_LINKS_TOTAL as i64 };
                        settings.max_links_total = budget as usize;
                        budget
                    } else {
                        let budget = if n > 0 { n } else { DEFAULT_MAX_LINKS_PER_TERM };
                        settings.max_links_per_term = budget;
                        budget
                    };
                    if n <= 0 {
                        report_info.push(format!(
                            "'{}' was {}, which the legacy engine read as its default; using {}",
                            key, value, budget
                        ));
                    }
                }
                "maxsingleurl" | "minusage" => {
                    let Some(n) = absint(value) else {
                        warnings.push(format!("'{}' is not a number: {}", key, value));
                        continue;
                    };
                    if key == "maxsingleurl" {
                        settings.max_same_target_url = n as usize;
                    } else {
                        settings.min_usage_threshold = n.min(u32::MAX as u64) as u32;
                    }
                }
                "nofoln" | "blankn" => {
                    if truthy(value) {
                        warnings.push(format!(
                            "'{}' decorated internal links; internal anchors are never decorated, option dropped",
                            key
                        ));
                    }
                }
                "notice" => report_info.push("Dropped admin notice flag".to_string()),
                other => warnings.push(format!("Unknown legacy option '{}'", other)),
            }
        }

        info!(
            options = legacy.0.len(),
            warnings = warnings.len(),
            "Migrated legacy options"
        );
        report_info.push(format!("Migrated {} legacy options", legacy.0.len()));

        MigrationReport {
            info: report_info,
            warnings,
            settings,
        }
    }
}

/// Legacy truthiness: `""`, `"0"`, `0`, `false` and `null` are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Absolute integer value, accepting numbers and numeric strings
fn absint(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.unsigned_abs())
            .or_else(|| n.as_u64())
            .or_else(|| n.as_f64().map(|f| f.abs().trunc() as u64)),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse::<i64>().ok().map(i64::unsigned_abs),
        Value::Bool(b) => Some(u64::from(*b)),
        Value::Null => Some(0),
        _ => None,
    }
}

/// Signed integer value; blank and null read as 0
fn intval(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null => Some(0),
        _ => None,
    }
}

fn pipe_list(value: &Value) -> Vec<String> {
    as_text(value)
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy(value: Value) -> LegacyOptions {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_truthiness_rules() {
        assert!(truthy(&json!("on")));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!("0")));
        assert!(!truthy(&json!(0)));
        assert!(truthy(&json!(1)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&Value::Null));
    }

    #[test]
    fn test_migrate_legacy_defaults() {
        let options = legacy(json!({
            "post": "on", "postself": "", "page": "on", "pageself": "",
            "comment": "", "excludeheading": "on", "excludefigcaption": "on",
            "lposts": "on", "lpages": "on", "lcats": "", "ltags": "",
            "ignore": "about", "ignorepost": "contact",
            "maxlinks": 3, "maxsingle": 1, "minusage": 1,
            "customkey": "", "customkey_preventduplicatelink": false,
            "nofoln": "", "nofolo": "", "blankn": "", "blanko": "",
            "onlysingle": "on", "casesens": "", "allowfeed": "",
            "maxsingleurl": "1", "notice": "1"
        }));
        let report = ConfigMigrator::migrate(&options);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.settings, LinkerSettings::default());
    }

    #[test]
    fn test_migrate_lists_numbers_and_keywords() {
        let options = legacy(json!({
            "ignore": "about | faq||",
            "ignorepost": "12|contact",
            "maxlinks": "-5",
            "maxsingle": "0",
            "customkey": "python|php|https://x/guides/",
            "casesens": "on",
            "blanko": "on"
        }));
        let report = ConfigMigrator::migrate(&options);
        let s = &report.settings;
        assert_eq!(s.ignored_terms, vec!["about", "faq"]);
        assert_eq!(s.ignored_entities, vec!["12", "contact"]);
        assert_eq!(s.max_links_total, DEFAULT_MAX_LINKS_TOTAL);
        assert_eq!(s.max_links_per_term, DEFAULT_MAX_LINKS_PER_TERM);
        assert!(s.case_sensitive);
        assert!(s.add_target_blank_external);
        assert_eq!(
            s.custom_keywords_text.as_deref(),
            Some("python|php|https://x/guides/")
        );
    }

    #[test]
    fn test_migrate_warns_on_unknown_and_dropped_options() {
        let options = legacy(json!({
            "blankn": "on",
            "mystery": 7,
            "maxlinks": "lots"
        }));
        let report = ConfigMigrator::migrate(&options);
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(report.settings.max_links_total, 3);
    }

    #[test]
    fn test_blank_and_zero_budgets_keep_legacy_defaults() {
        let options = legacy(json!({ "maxlinks": "", "maxsingle": 0 }));
        let report = ConfigMigrator::migrate(&options);
        let config = report.settings.clone().validate().unwrap();

        assert_eq!(config.total_limit(), Some(3));
        assert_eq!(config.per_term_limit(), Some(1));
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.info.iter().filter(|l| l.contains("legacy engine read as its default")).count(),
            2
        );

        let options = legacy(json!({ "maxlinks": "7", "maxsingle": 2.0 }));
        let settings = ConfigMigrator::migrate(&options).settings;
        assert_eq!(settings.max_links_total, 7);
        assert_eq!(settings.max_links_per_term, 2);
    }
}
