use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use interlink_cli::{
    cli::{Cli, Commands},
    commands,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Explicit flags win over RUST_LOG
    let env_filter = match cli.level_filter() {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Annotate(args) => commands::annotate::execute(args),
        Commands::CheckConfig { path } => commands::check_config::execute(path),
        Commands::MigrateLegacy { json, output } => commands::migrate::execute(json, output),
    }
}
