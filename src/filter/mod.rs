//! Item filters: a small boolean algebra over parsed feed entries.
//!
//! A [`Filter`] is a tree of predicates evaluated against one [`Entry`] at a
//! time. The leaves are:
//!
//! - [`Filter::True`] - matches everything
//! - [`Filter::Regexp`] - whole-word, case-insensitive term matching
//! - [`Filter::Since`] - recency against a threshold
//! - [`Filter::Count`] - admits the first `limit` evaluations
//!
//! combined with [`Filter::And`], [`Filter::Or`] and [`Filter::Not`].
//!
//! `Count` is the only stateful node. Every evaluation advances it, so one
//! tree counts across everything it is shown. The aggregator hands each
//! source its own [`Filter::fresh`] copy, which makes `--limit` a per-source
//! cap.
//!
//! # Example
//!
//! ```
//! use darling::feed::Entry;
//! use darling::filter::Filter;
//!
//! let mut filter = Filter::include(&["crypto"], &["rust"], None, 0);
//!
//! let blocked = Entry { title: "Crypto weekly".into(), ..Default::default() };
//! let rescued = Entry { title: "Crypto in Rust".into(), ..Default::default() };
//! assert!(!filter.matches(&blocked));
//! assert!(filter.matches(&rescued));
//! ```

mod since;

pub use since::{parse_threshold, SinceError};

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};

use crate::feed::Entry;

/// Wildcard term: a term list containing it matches every entry.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone)]
pub enum Filter {
    True,
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
    /// Matches when any pattern hits the content, title or description.
    Regexp(Vec<Regex>),
    /// Matches entries published (or, lacking that, updated) strictly after
    /// the threshold. Entries with neither timestamp never match.
    Since(DateTime<Utc>),
    /// `limit == 0` is unlimited.
    Count { limit: usize, seen: usize },
}

impl Filter {
    pub fn and(left: Filter, right: Filter) -> Self {
        Filter::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Filter, right: Filter) -> Self {
        Filter::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(base: Filter) -> Self {
        Filter::Not(Box::new(base))
    }

    pub fn count(limit: usize) -> Self {
        Filter::Count { limit, seen: 0 }
    }

    /// Builds a term filter from user-supplied words.
    ///
    /// Each word is trimmed and escaped, so `"this weekend"` only matches that
    /// literal phrase and `"c++"` is not read as a pattern. A side of the word
    /// that ends in a word character must sit on a word boundary; a side that
    /// ends in punctuation must meet a non-word character or the text edge.
    /// Blank words are dropped. Any word equal to [`WILDCARD`] turns the whole filter into
    /// [`Filter::True`].
    pub fn regexp<S: AsRef<str>>(words: &[S]) -> Self {
        if words.iter().any(|w| w.as_ref() == WILDCARD) {
            return Filter::True;
        }

        let patterns = words
            .iter()
            .map(|w| w.as_ref().trim())
            .filter(|w| !w.is_empty())
            .filter_map(|word| {
                let pattern = word_pattern(word);
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!(term = %word, error = %e, "Skipping filter term");
                        None
                    }
                }
            })
            .collect();

        Filter::Regexp(patterns)
    }

    /// The predicate used for aggregation.
    ///
    /// An entry passes unless it hits the blacklist, and a whitelist hit
    /// overrides the blacklist. A recency threshold and a count limit are
    /// ANDed on top when given. The count sits last so it only counts entries
    /// that passed everything else.
    pub fn include<S: AsRef<str>>(
        blacklist: &[S],
        whitelist: &[S],
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Self {
        let mut filter = Filter::or(
            Filter::not(Filter::regexp(blacklist)),
            Filter::regexp(whitelist),
        );
        if let Some(threshold) = since {
            filter = Filter::and(filter, Filter::Since(threshold));
        }
        if limit > 0 {
            filter = Filter::and(filter, Filter::count(limit));
        }
        filter
    }

    pub fn matches(&mut self, entry: &Entry) -> bool {
        match self {
            Filter::True => true,
            Filter::And(left, right) => left.matches(entry) && right.matches(entry),
            Filter::Or(left, right) => left.matches(entry) || right.matches(entry),
            Filter::Not(base) => !base.matches(entry),
            Filter::Regexp(patterns) => patterns.iter().any(|re| {
                re.is_match(&entry.content)
                    || re.is_match(&entry.title)
                    || re.is_match(&entry.description)
            }),
            Filter::Since(threshold) => entry
                .published
                .or(entry.updated)
                .is_some_and(|ts| ts > *threshold),
            Filter::Count { limit, seen } => {
                if *limit == 0 {
                    return true;
                }
                *seen = seen.saturating_add(1);
                *seen <= *limit
            }
        }
    }

    /// Clears every counter in the tree.
    pub fn reset(&mut self) {
        match self {
            Filter::And(left, right) | Filter::Or(left, right) => {
                left.reset();
                right.reset();
            }
            Filter::Not(base) => base.reset(),
            Filter::Count { seen, .. } => *seen = 0,
            Filter::True | Filter::Regexp(_) | Filter::Since(_) => {}
        }
    }

    /// A copy with all counters cleared, for evaluating an independent source.
    pub fn fresh(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn word_pattern(word: &str) -> String {
    let head = match word.chars().next() {
        Some(c) if is_word_char(c) => r"\b",
        _ => r"(?:^|\W)",
    };
    let tail = match word.chars().last() {
        Some(c) if is_word_char(c) => r"\b",
        _ => r"(?:\W|$)",
    };
    format!("{head}{}{tail}", regex::escape(word))
}
