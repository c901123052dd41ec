use chrono::{DateTime, Utc};

// ============================================================================
// Parsed Entries
// ============================================================================

/// A single entry as parsed from a source document.
///
/// Text fields are normalized to owned strings (empty when the source omits
/// them). Timestamps stay optional so filters can distinguish "absent
/// upstream" from "defaulted".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub title: String,
    pub content: String,
    pub description: String,
    pub id: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

// ============================================================================
// Output Model
// ============================================================================

/// An entry accepted into the output feed.
///
/// `created` is always populated: entries without a published date take the
/// run's start time.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub title: String,
    pub content: String,
    pub description: String,
    pub id: String,
    pub link: String,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl Item {
    /// Normalizes a parsed entry, defaulting `created` to `now`.
    pub fn from_entry(entry: Entry, now: DateTime<Utc>) -> Self {
        Self {
            title: entry.title,
            content: entry.content,
            description: entry.description,
            id: entry.id,
            link: entry.link,
            created: entry.published.unwrap_or(now),
            updated: entry.updated,
        }
    }
}

/// The merged output feed handed to the serializer.
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub author: String,
    pub link: String,
    pub items: Vec<Item>,
}

impl Feed {
    pub const TITLE: &'static str = "Darling";
    pub const DESCRIPTION: &'static str = "Your darlings, killfiled";
    pub const AUTHOR: &'static str = "You";

    /// Builds the output feed with the fixed metadata and already-sorted items.
    pub fn new(created: DateTime<Utc>, items: Vec<Item>) -> Self {
        Self {
            title: Self::TITLE.to_string(),
            description: Self::DESCRIPTION.to_string(),
            created,
            author: Self::AUTHOR.to_string(),
            link: String::new(),
            items,
        }
    }
}
