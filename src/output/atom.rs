use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, Event};

use super::{empty, end, finish, new_writer, start, text_element};
use crate::feed::Feed;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Feed `id` used when the feed has no link of its own.
const FALLBACK_FEED_ID: &str = "urn:darling:feed";

fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serializes the feed as an Atom 1.0 document.
///
/// Item fields map to `title`, `content`, `summary`, `id`, `link`,
/// `published` (created) and `updated` (updated, falling back to created,
/// since Atom requires it).
pub fn to_atom(feed: &Feed) -> Result<String> {
    let mut writer = new_writer();

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("Failed to write XML declaration")?;

    start(&mut writer, "feed", &[("xmlns", ATOM_NS)])?;
    text_element(&mut writer, "title", &[], &feed.title)?;
    let feed_id = if feed.link.is_empty() {
        FALLBACK_FEED_ID
    } else {
        feed.link.as_str()
    };
    text_element(&mut writer, "id", &[], feed_id)?;
    text_element(&mut writer, "updated", &[], &timestamp(&feed.created))?;
    text_element(&mut writer, "subtitle", &[], &feed.description)?;
    if !feed.link.is_empty() {
        empty(&mut writer, "link", &[("href", feed.link.as_str())])?;
    }
    start(&mut writer, "author", &[])?;
    text_element(&mut writer, "name", &[], &feed.author)?;
    end(&mut writer, "author")?;

    for item in &feed.items {
        start(&mut writer, "entry", &[])?;
        text_element(&mut writer, "title", &[], &item.title)?;
        let updated = item.updated.unwrap_or(item.created);
        text_element(&mut writer, "updated", &[], &timestamp(&updated))?;
        text_element(&mut writer, "id", &[], &item.id)?;
        if !item.content.is_empty() {
            text_element(&mut writer, "content", &[("type", "html")], &item.content)?;
        }
        if !item.link.is_empty() {
            empty(
                &mut writer,
                "link",
                &[("href", item.link.as_str()), ("rel", "alternate")],
            )?;
        }
        if !item.description.is_empty() {
            text_element(&mut writer, "summary", &[("type", "html")], &item.description)?;
        }
        text_element(&mut writer, "published", &[], &timestamp(&item.created))?;
        end(&mut writer, "entry")?;
    }

    end(&mut writer, "feed")?;
    finish(writer)
}
