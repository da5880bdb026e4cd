use anyhow::{Context, Result};
use interlink_catalog::{CachedCatalogProvider, InMemorySource};
use interlink_config::{ConfigLoader, EntityKind};
use interlink_core::{process_document, CandidateCatalog, DocumentContext, DocumentOutcome};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::cli::AnnotateArgs;

/// Execute the annotate subcommand
pub fn execute(args: AnnotateArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let outcome = run(&args, &text)?;

    match &outcome.gate {
        Some(gate) => info!(%gate, "Document left untouched"),
        None => info!(links = outcome.links_inserted, "Document annotated"),
    }

    match &args.output {
        Some(path) => std::fs::write(path, &outcome.text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(outcome.text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Annotate `text` as described by `args`
pub fn run(args: &AnnotateArgs, text: &str) -> Result<DocumentOutcome> {
    let config = ConfigLoader::load_or_default(args.config.as_deref())
        .context("Failed to load settings")?;

    let source = InMemorySource::load(&args.catalog)
        .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?;
    let provider = CachedCatalogProvider::new(source);
    let catalog = CandidateCatalog::from_provider(&provider, &config);
    debug!(candidates = catalog.len(), "Candidate catalog built");

    let context = context_from_args(args);
    Ok(process_document(
        text,
        context.is_comment,
        &context,
        &catalog,
        &config,
    ))
}

fn context_from_args(args: &AnnotateArgs) -> DocumentContext {
    DocumentContext {
        entity_id: args.entity_id.clone(),
        entity_kind: args.kind,
        entity_slug: args.slug.clone(),
        entity_title: args.title.clone(),
        permalink: args.permalink.clone(),
        is_comment: args.kind == EntityKind::Comment,
        is_feed: args.feed,
        is_single_view: !args.not_single,
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(kind: EntityKind) -> AnnotateArgs {
        AnnotateArgs {
            input: PathBuf::from("-"),
            catalog: PathBuf::from("site.json"),
            config: None,
            permalink: Some("https://example.com/hello/".into()),
            kind,
            entity_id: Some("1".into()),
            slug: Some("hello".into()),
            title: None,
            feed: false,
            not_single: false,
            output: None,
        }
    }

    #[test]
    fn test_context_from_args() {
        let context = context_from_args(&args(EntityKind::Post));
        assert_eq!(context.entity_kind, EntityKind::Post);
        assert_eq!(context.entity_id.as_deref(), Some("1"));
        assert!(context.is_single_view);
        assert!(!context.is_comment);
        assert!(!context.is_feed);
    }

    #[test]
    fn test_comment_kind_marks_comment() {
        let mut args = args(EntityKind::Comment);
        args.not_single = true;
        let context = context_from_args(&args);
        assert!(context.is_comment);
        assert!(!context.is_single_view);
    }
}
