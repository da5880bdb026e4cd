//! End-to-end scenarios through `annotate_document`

use interlink_config::{EntityKind, LinkerConfig, LinkerSettings};
use interlink_core::{
    annotate_document, custom_keyword_candidates, process_document, CandidateCatalog,
    CandidateKind, DocumentContext, LinkCandidate,
};

const PERMALINK: &str = "https://example.com/blog/hello-world/";

fn post_context() -> DocumentContext {
    DocumentContext {
        entity_slug: Some("hello-world".into()),
        entity_title: Some("Hello World".into()),
        ..DocumentContext::single(EntityKind::Post, "42", PERMALINK)
    }
}

fn content(candidates: Vec<LinkCandidate>) -> CandidateCatalog {
    CandidateCatalog::from_lists(vec![], candidates, vec![], vec![])
}

fn post(term: &str, url: &str, id: &str, order: usize) -> LinkCandidate {
    LinkCandidate::new(term, url, CandidateKind::Post, Some(id.into()), order)
}

#[test]
fn test_longest_match_first() {
    let catalog = content(vec![
        post("Cat", "https://example.com/cat/", "1", 0),
        post("Category", "https://example.com/category/", "2", 1),
    ]);
    let out = annotate_document(
        "Category theory",
        false,
        &post_context(),
        &catalog,
        &LinkerConfig::default(),
    );

    assert_eq!(
        out,
        r#"<a title="Category" href="https://example.com/category/">Category</a> theory"#
    );
    assert!(!out.contains("https://example.com/cat/"));
}

#[test]
fn test_ignored_entity_page_is_untouched() {
    let context = DocumentContext {
        entity_slug: Some("contact".into()),
        ..DocumentContext::single(EntityKind::Page, "5", "https://example.com/contact/")
    };
    let catalog = content(vec![post("Pricing Plans", "https://example.com/pricing/", "9", 0)]);
    let text = "<p>See our Pricing Plans before you write.</p>";

    let out = annotate_document(text, false, &context, &catalog, &LinkerConfig::default());
    assert_eq!(out, text);
}

#[test]
fn test_custom_keyword_line_links_every_keyword() {
    let config = LinkerSettings {
        custom_keywords_text: Some("python|php|javascript|https://x/guides/".into()),
        ..LinkerSettings::default()
    }
    .validate()
    .unwrap();
    assert_eq!(config.max_links_per_term, 1);
    assert_eq!(config.max_links_total, 3);

    let catalog =
        CandidateCatalog::from_lists(custom_keyword_candidates(&config), vec![], vec![], vec![]);
    let outcome = process_document("I love python and php", false, &post_context(), &catalog, &config);

    assert_eq!(
        outcome.text,
        r#"I love <a href="https://x/guides/">python</a> and <a href="https://x/guides/">php</a>"#
    );
    assert_eq!(outcome.links_inserted, 2);
}

#[test]
fn test_heading_occurrence_stays_plain() {
    let catalog = content(vec![post("python", "https://example.com/python/", "7", 0)]);
    let text = "<h2>Python Guide</h2><p>python is great</p>";

    let out = annotate_document(text, false, &post_context(), &catalog, &LinkerConfig::default());
    assert_eq!(
        out,
        r#"<h2>Python Guide</h2><p><a title="python" href="https://example.com/python/">python</a> is great</p>"#
    );
}

#[test]
fn test_duplicate_target_keeps_first_by_rank() {
    let catalog = content(vec![
        post("Rust Ownership", "/guides/rust/", "3", 0),
        post("Borrowing", "https://example.com/guides/rust", "4", 1),
    ]);
    let mut config = LinkerConfig::default();
    config.prevent_duplicate_target = true;
    config.max_same_target_url = 0;

    let outcome = process_document(
        "Borrowing is part of Rust Ownership.",
        false,
        &post_context(),
        &catalog,
        &config,
    );
    assert_eq!(outcome.links_inserted, 1);
    assert_eq!(
        outcome.text,
        r#"Borrowing is part of <a title="Rust Ownership" href="/guides/rust/">Rust Ownership</a>."#
    );
}

#[test]
fn test_no_self_link_in_output() {
    let catalog = content(vec![
        post("Hello World", "http://example.com/blog/hello-world", "42", 0),
        post("Greeting", "https://example.com/blog/greeting/", "43", 1),
    ]);
    let text = concat!(
        "Hello World! A Greeting. ",
        r#"Also <a href="https://example.com/blog/hello-world/#more">this</a>"#,
        r#" and <a href="/blog/hello-world/">that</a>."#
    );

    let out = annotate_document(text, false, &post_context(), &catalog, &LinkerConfig::default());
    assert_eq!(
        out,
        concat!(
            r#"Hello World! A <a title="Greeting" href="https://example.com/blog/greeting/">Greeting</a>. "#,
            r#"Also <a href="https://example.com/blog/hello-world/#more">this</a> and that."#
        )
    );
}

#[test]
fn test_self_links_allowed_for_kind() {
    let mut config = LinkerConfig::default();
    config.allow_self_link.insert(EntityKind::Post, true);
    let catalog = content(vec![post("Hello World", PERMALINK, "42", 0)]);

    let out = annotate_document("Hello World!", false, &post_context(), &catalog, &config);
    assert_eq!(out, format!(r#"<a title="Hello World" href="{}">Hello World</a>!"#, PERMALINK));
}

#[test]
fn test_external_decoration_skips_protected_zones() {
    let mut config = LinkerConfig::default();
    config.add_nofollow_external = true;
    config.add_target_blank_external = true;

    let text = concat!(
        r#"<h3><a href="https://other.org/a">in heading</a></h3>"#,
        r#"<p><a href="https://other.org/b">in body</a> <a href="/local">local</a></p>"#
    );
    let out = annotate_document(text, false, &post_context(), &CandidateCatalog::default(), &config);
    assert_eq!(
        out,
        concat!(
            r#"<h3><a href="https://other.org/a">in heading</a></h3>"#,
            r#"<p><a href="https://other.org/b" rel="nofollow" target="_blank">in body</a> <a href="/local">local</a></p>"#
        )
    );
}

#[test]
fn test_attribute_values_are_never_linked() {
    let catalog = content(vec![post("python", "https://example.com/python/", "7", 0)]);
    let text = r#"<img alt="python logo" title="python" data-term="python" src="p.png"> python"#;

    let out = annotate_document(text, false, &post_context(), &catalog, &LinkerConfig::default());
    assert_eq!(
        out,
        r#"<img alt="python logo" title="python" data-term="python" src="p.png"> <a title="python" href="https://example.com/python/">python</a>"#
    );
}

#[test]
fn test_caption_block_is_protected() {
    let catalog = content(vec![post("python", "https://example.com/python/", "7", 0)]);
    let text = r#"[caption id="a1"]<img src="p.png"> python snake[/caption] python"#;

    let out = annotate_document(text, false, &post_context(), &catalog, &LinkerConfig::default());
    assert!(out.starts_with(r#"[caption id="a1"]<img src="p.png"> python snake[/caption] "#));
    assert!(out.ends_with(r#"<a title="python" href="https://example.com/python/">python</a>"#));
}

#[test]
fn test_comments_need_their_toggle() {
    let catalog = content(vec![post("python", "https://example.com/python/", "7", 0)]);
    let mut config = LinkerConfig::default();

    let out = annotate_document("python", true, &post_context(), &catalog, &config);
    assert_eq!(out, "python");

    config.process_comments = true;
    let out = annotate_document("python", true, &post_context(), &catalog, &config);
    assert!(out.contains("<a title=\"python\""));
}

#[test]
fn test_nested_caption_blocks_stay_plain() {
    let catalog = content(vec![post("python", "https://example.com/python/", "7", 0)]);
    let config = LinkerConfig::default();

    let text = r#"[caption id="o"]outer [caption id="i"]inner[/caption] python[/caption]"#;
    assert_eq!(annotate_document(text, false, &post_context(), &catalog, &config), text);

    let text = "<figure><figcaption>a <figcaption>b</figcaption> python</figcaption></figure>";
    assert_eq!(annotate_document(text, false, &post_context(), &catalog, &config), text);
}

#[test]
fn test_keyword_named_like_ignored_entity_is_linked() {
    let config = LinkerSettings {
        custom_keywords_text: Some("contact|https://example.com/support/".into()),
        ..LinkerSettings::default()
    }
    .validate()
    .unwrap();
    assert!(config.is_entity_ignored("contact"));

    let catalog =
        CandidateCatalog::from_lists(custom_keyword_candidates(&config), vec![], vec![], vec![]);
    let out = annotate_document("Please contact us.", false, &post_context(), &catalog, &config);
    assert_eq!(out, r#"Please <a href="https://example.com/support/">contact</a> us."#);
}
