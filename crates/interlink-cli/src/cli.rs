use clap::{Parser, Subcommand, ValueEnum};
use interlink_config::EntityKind;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages (default for verbose)
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "interlink")]
#[command(about = "interlink - automatic internal linking for HTML content")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace).
    /// Defaults to 'warn', or to RUST_LOG when set
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Level the subscriber should filter at, if any flag asked for one
    pub fn level_filter(&self) -> Option<LevelFilter> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.into()),
            (None, true) => Some(LevelFilter::DEBUG),
            (None, false) => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Annotate one HTML document with internal links
    Annotate(AnnotateArgs),

    /// Validate a settings file and print the effective configuration as JSON
    CheckConfig {
        /// Settings file (defaults to ~/.config/interlink/config.toml)
        path: Option<PathBuf>,
    },

    /// Convert a legacy options export (JSON) to a TOML settings file
    MigrateLegacy {
        /// Legacy options JSON file
        json: PathBuf,

        /// Write the TOML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct AnnotateArgs {
    /// HTML document to annotate ('-' reads stdin)
    pub input: PathBuf,

    /// JSON export of posts, pages, categories and tags
    #[arg(long)]
    pub catalog: PathBuf,

    /// Settings file (defaults to ~/.config/interlink/config.toml)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// The document's own address
    #[arg(long)]
    pub permalink: Option<String>,

    /// Entity kind (post, page, comment, other)
    #[arg(long, default_value = "post")]
    pub kind: EntityKind,

    /// Identifier of the document
    #[arg(long)]
    pub entity_id: Option<String>,

    /// URL slug of the document
    #[arg(long)]
    pub slug: Option<String>,

    /// Title of the document
    #[arg(long)]
    pub title: Option<String>,

    /// Render as a feed (leaves the document untouched)
    #[arg(long)]
    pub feed: bool,

    /// Render as a listing rather than a single-document view
    #[arg(long)]
    pub not_single: bool,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_annotate() {
        let cli = Cli::try_parse_from([
            "interlink",
            "annotate",
            "post.html",
            "--catalog",
            "site.json",
            "--kind",
            "page",
            "--permalink",
            "https://example.com/about/",
            "--not-single",
        ])
        .unwrap();

        match cli.command {
            Commands::Annotate(args) => {
                assert_eq!(args.input, PathBuf::from("post.html"));
                assert_eq!(args.catalog, PathBuf::from("site.json"));
                assert_eq!(args.kind, EntityKind::Page);
                assert_eq!(args.permalink.as_deref(), Some("https://example.com/about/"));
                assert!(args.not_single);
                assert!(!args.feed);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_annotate_requires_catalog() {
        assert!(Cli::try_parse_from(["interlink", "annotate", "post.html"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let result = Cli::try_parse_from([
            "interlink",
            "annotate",
            "post.html",
            "--catalog",
            "site.json",
            "--kind",
            "attachment",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_log_flags() {
        let cli = Cli::try_parse_from(["interlink", "check-config", "-v"]).unwrap();
        assert_eq!(cli.level_filter(), Some(LevelFilter::DEBUG));

        let cli =
            Cli::try_parse_from(["interlink", "--log-level", "trace", "check-config", "-v"])
                .unwrap();
        assert_eq!(cli.level_filter(), Some(LevelFilter::TRACE));

        let cli = Cli::try_parse_from(["interlink", "check-config"]).unwrap();
        assert_eq!(cli.level_filter(), None);
        assert!(matches!(cli.command, Commands::CheckConfig { path: None }));
    }
}
