use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, Event};

use super::{end, finish, new_writer, start, text_element};
use crate::feed::Feed;

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

/// Serializes the feed as an RSS 2.0 document.
///
/// Item content goes to `content:encoded`, the description to
/// `description`, and the created timestamp to `pubDate`. RSS has no field
/// for an update time, so `updated` is not written.
pub fn to_rss(feed: &Feed) -> Result<String> {
    let mut writer = new_writer();

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("Failed to write XML declaration")?;

    start(
        &mut writer,
        "rss",
        &[("version", "2.0"), ("xmlns:content", CONTENT_NS)],
    )?;
    start(&mut writer, "channel", &[])?;
    text_element(&mut writer, "title", &[], &feed.title)?;
    text_element(&mut writer, "link", &[], &feed.link)?;
    text_element(&mut writer, "description", &[], &feed.description)?;
    text_element(&mut writer, "pubDate", &[], &feed.created.to_rfc2822())?;

    for item in &feed.items {
        start(&mut writer, "item", &[])?;
        text_element(&mut writer, "title", &[], &item.title)?;
        text_element(&mut writer, "link", &[], &item.link)?;
        text_element(&mut writer, "description", &[], &item.description)?;
        if !item.content.is_empty() {
            text_element(&mut writer, "content:encoded", &[], &item.content)?;
        }
        if !item.id.is_empty() {
            text_element(&mut writer, "guid", &[("isPermaLink", "false")], &item.id)?;
        }
        text_element(&mut writer, "pubDate", &[], &item.created.to_rfc2822())?;
        end(&mut writer, "item")?;
    }

    end(&mut writer, "channel")?;
    end(&mut writer, "rss")?;
    finish(writer)
}
