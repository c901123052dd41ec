use std::fmt;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::fetcher::{self, FetchError, FetchLimits};
use super::source::{Source, SourceError};
use super::types::{Entry, Item};
use crate::filter::Filter;

/// One source that contributed nothing, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: String,
    pub reason: String,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.reason)
    }
}

impl From<SourceError> for SourceFailure {
    fn from(e: SourceError) -> Self {
        Self {
            source: e.token,
            reason: SourceError::REASON.to_string(),
        }
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Accepted items, newest first.
    pub items: Vec<Item>,
    /// Sources that were skipped, in completion order.
    pub failures: Vec<SourceFailure>,
}

/// Message from a source task to the collector.
type Outcome = (String, Result<Vec<Item>, FetchError>);

/// Fans sources out to concurrent tasks and merges what passes the filter.
#[derive(Debug, Clone)]
pub struct Aggregator {
    client: reqwest::Client,
    filter: Filter,
    limits: FetchLimits,
}

impl Aggregator {
    pub fn new(client: reqwest::Client, filter: Filter, limits: FetchLimits) -> Self {
        Self {
            client,
            filter,
            limits,
        }
    }

    /// Loads every source concurrently and returns the merged, sorted items.
    ///
    /// Each source runs in its own task with its own copy of the filter, so
    /// count limits apply per source. Tasks report through a channel to this
    /// function, which is the only owner of the merged list. A failing or
    /// panicking source is recorded in [`Aggregation::failures`] and never
    /// affects its siblings.
    ///
    /// Entries without a published date are stamped with `now`.
    pub async fn run(&self, sources: Vec<Source>, now: DateTime<Utc>) -> Aggregation {
        let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
        let mut handles = Vec::with_capacity(sources.len());

        for source in sources {
            let label = source.to_string();
            let tx = tx.clone();
            let client = self.client.clone();
            let limits = self.limits;
            let mut filter = self.filter.fresh();

            let task_label = label.clone();
            let handle = tokio::spawn(async move {
                let outcome = fetcher::load(&client, &source, &limits)
                    .await
                    .map(|entries| select(entries, &mut filter, now));

                match &outcome {
                    Ok(items) => {
                        tracing::debug!(source = %task_label, accepted = items.len(), "Source done")
                    }
                    Err(e) => tracing::debug!(source = %task_label, error = %e, "Source failed"),
                }

                // Receiver outlives every task; a send error is unreachable.
                let _ = tx.send((task_label, outcome));
            });
            handles.push((label, handle));
        }
        drop(tx);

        let mut aggregation = Aggregation::default();
        while let Some((source, outcome)) = rx.recv().await {
            match outcome {
                Ok(items) => aggregation.items.extend(items),
                Err(e) => aggregation.failures.push(SourceFailure {
                    source,
                    reason: e.to_string(),
                }),
            }
        }

        for (source, handle) in handles {
            if let Err(e) = handle.await {
                tracing::warn!(source = %source, error = %e, "Source task aborted");
                aggregation.failures.push(SourceFailure {
                    source,
                    reason: format!("task aborted: {}", e),
                });
            }
        }

        sort_newest_first(&mut aggregation.items);
        aggregation
    }
}

/// Runs `filter` over one source's entries and normalizes the survivors.
pub fn select(entries: Vec<Entry>, filter: &mut Filter, now: DateTime<Utc>) -> Vec<Item> {
    entries
        .into_iter()
        .filter(|entry| filter.matches(entry))
        .map(|entry| Item::from_entry(entry, now))
        .collect()
}

/// Sorts by `created`, newest first. Items with equal timestamps keep their
/// relative order.
pub fn sort_newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| b.created.cmp(&a.created));
}
