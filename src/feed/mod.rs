//! Feed sources, fetching, parsing and aggregation.
//!
//! - [`source`] - classifying command-line tokens as URLs or paths
//! - [`fetcher`] - HTTP and file retrieval with timeouts and size limits
//! - [`parser`] - RSS/Atom parsing using the `feed-rs` crate
//! - [`aggregator`] - concurrent fan-out/fan-in and ordering
//!
//! # Example
//!
//! ```ignore
//! use darling::feed::{resolve_all, Aggregator, FetchLimits};
//!
//! let (sources, rejected) = resolve_all(&tokens);
//! let aggregator = Aggregator::new(client, filter, FetchLimits::default());
//! let result = aggregator.run(sources, Utc::now()).await;
//! ```

mod aggregator;
mod fetcher;
mod parser;
mod source;
mod types;

pub use aggregator::{select, sort_newest_first, Aggregation, Aggregator, SourceFailure};
pub use fetcher::{
    build_client, fetch_url, load, read_local, FetchError, FetchLimits, DEFAULT_MAX_FEED_SIZE,
    DEFAULT_TIMEOUT,
};
pub use parser::parse_feed;
pub use source::{resolve, resolve_all, Source, SourceError};
pub use types::{Entry, Feed, Item};
