use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use darling::app::{self, Overrides, Settings};
use darling::config::Config;
use darling::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "darling",
    version,
    about = "Merge RSS and Atom feeds, minus the items you never want to see"
)]
struct Args {
    /// Feed URLs (http/https) or paths to feed files
    #[arg(value_name = "SOURCE")]
    sources: Vec<String>,

    /// Drop items mentioning TERM (repeatable)
    #[arg(short, long, value_name = "TERM")]
    blacklist: Vec<String>,

    /// Keep items mentioning TERM even when blacklisted (repeatable)
    #[arg(short, long, value_name = "TERM")]
    whitelist: Vec<String>,

    /// Items to take from each source, 0 for no limit
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Only keep items published after WHEN (RFC 3339, YYYY-MM-DD or e.g. 12H, 7d, 1m, 2Y)
    #[arg(short, long, value_name = "WHEN")]
    since: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Config file (default: ~/.config/darling/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-source fetch timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries only the feed document.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let limit = match args.limit {
        Some(n) if n < 0 => Args::command()
            .error(
                ErrorKind::ValueValidation,
                format!("--limit must not be negative (got {n})"),
            )
            .exit(),
        other => other.map(i64::unsigned_abs),
    };

    // A non-terminal stdin only means there is work to do; it is never read.
    let piped = !std::io::stdin().is_terminal();
    if args.sources.is_empty() && !piped {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "no sources given and nothing piped on stdin",
            )
            .exit();
    }

    let config = match args.config.or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()))?,
        None => Config::default(),
    };

    let settings = Settings::merge(
        config,
        Overrides {
            blacklist: args.blacklist,
            whitelist: args.whitelist,
            limit,
            since: args.since,
            format: args.format,
            timeout_secs: args.timeout,
        },
    );

    let report = app::run(&settings, &args.sources, Utc::now()).await?;

    for failure in &report.diagnostics {
        eprintln!("darling: {failure}");
    }
    tracing::info!(
        items = report.items,
        failed = report.diagnostics.len(),
        "Done"
    );
    println!("{}", report.document);

    Ok(())
}
