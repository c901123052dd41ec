//! One aggregation run, from settings and source tokens to a serialized feed.
//!
//! [`Settings::merge`] folds the config file and command-line values
//! together, and [`run`] does the rest: it builds the filter, resolves sources,
//! fetches them concurrently and renders the document. Per-source problems end
//! up in [`Report::diagnostics`]. Only a bad threshold, a client that cannot be
//! built, or a serialization failure abort the run.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::feed::{build_client, resolve_all, Aggregator, Feed, FetchLimits, SourceFailure};
use crate::filter::{parse_threshold, Filter};
use crate::output::{render, OutputFormat};

/// Effective settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
    /// Items taken from each source; 0 means unlimited.
    pub limit: usize,
    pub since: Option<String>,
    pub format: OutputFormat,
    pub limits: FetchLimits,
}

/// Values given on the command line. `None` leaves the config value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
    pub limit: Option<u64>,
    pub since: Option<String>,
    pub format: Option<OutputFormat>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Combines file config with command-line values.
    ///
    /// Term lists are concatenated, config terms first. Scalars given on the
    /// command line replace the configured ones.
    pub fn merge(config: Config, overrides: Overrides) -> Self {
        let mut blacklist = config.blacklist;
        blacklist.extend(overrides.blacklist);
        let mut whitelist = config.whitelist;
        whitelist.extend(overrides.whitelist);

        let limit = overrides.limit.unwrap_or(config.limit);
        let timeout_secs = overrides.timeout_secs.unwrap_or(config.timeout_secs);

        Self {
            blacklist,
            whitelist,
            limit: usize::try_from(limit).unwrap_or(usize::MAX),
            since: overrides.since.or(config.since),
            format: overrides.format.unwrap_or(config.format),
            limits: FetchLimits {
                timeout: Duration::from_secs(timeout_secs),
                max_bytes: usize::try_from(config.max_feed_bytes).unwrap_or(usize::MAX),
            },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::merge(Config::default(), Overrides::default())
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct Report {
    /// The serialized feed, ready for stdout.
    pub document: String,
    /// Number of items in `document`.
    pub items: usize,
    /// One entry per source that contributed nothing.
    pub diagnostics: Vec<SourceFailure>,
}

/// Aggregates the sources named by `tokens` into one feed document.
///
/// `now` is the run's reference time: relative thresholds count back from
/// it, undated entries are stamped with it and it becomes the feed's own
/// timestamp.
///
/// # Errors
///
/// Fails when the since threshold does not parse, the HTTP client cannot be
/// built, or the feed cannot be serialized. Unusable sources never fail the
/// run.
pub async fn run(settings: &Settings, tokens: &[String], now: DateTime<Utc>) -> Result<Report> {
    let threshold = settings
        .since
        .as_deref()
        .map(|since| parse_threshold(since, now))
        .transpose()
        .context("Invalid --since value")?;

    let filter = Filter::include(
        &settings.blacklist,
        &settings.whitelist,
        threshold,
        settings.limit,
    );
    tracing::debug!(?filter, "Built filter");

    let (sources, rejected) = resolve_all(tokens);

    let client = build_client(&settings.limits).context("Failed to build HTTP client")?;
    let aggregator = Aggregator::new(client, filter, settings.limits);

    tracing::info!(sources = sources.len(), rejected = rejected.len(), "Aggregating");
    let aggregation = aggregator.run(sources, now).await;

    let mut diagnostics: Vec<SourceFailure> = rejected.into_iter().map(Into::into).collect();
    diagnostics.extend(aggregation.failures);

    let feed = Feed::new(now, aggregation.items);
    let items = feed.items.len();
    let document = render(&feed, settings.format).context("Failed to serialize feed")?;

    Ok(Report {
        document,
        items,
        diagnostics,
    })
}
