//! Serializing the merged feed as Atom 1.0 or RSS 2.0.
//!
//! Both writers drive `quick-xml`'s event [`Writer`](quick_xml::Writer)
//! directly; there is no intermediate document tree. Text and attribute
//! values are escaped by the writer and stripped of characters XML 1.0
//! cannot represent.

mod atom;
mod rss;

use std::io::Cursor;

use anyhow::{Context, Result};
use clap::ValueEnum;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;

use crate::feed::Feed;
use crate::util::strip_xml_invalid_chars;

pub use atom::to_atom;
pub use rss::to_rss;

/// Syndication format of the output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Atom,
    #[default]
    Rss,
}

/// Serializes `feed` in the requested format.
pub fn render(feed: &Feed, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Atom => to_atom(feed),
        OutputFormat::Rss => to_rss(feed),
    }
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn new_writer() -> XmlWriter {
    Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2)
}

fn finish(writer: XmlWriter) -> Result<String> {
    let result = writer.into_inner().into_inner();
    String::from_utf8(result).context("Generated feed contains invalid UTF-8")
}

fn start(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut element = BytesStart::new(name);
    for (key, value) in attrs {
        element.push_attribute((*key, strip_xml_invalid_chars(value).as_ref()));
    }
    writer
        .write_event(Event::Start(element))
        .with_context(|| format!("Failed to write {} element", name))
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("Failed to write {} end", name))
}

fn empty(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut element = BytesStart::new(name);
    for (key, value) in attrs {
        element.push_attribute((*key, strip_xml_invalid_chars(value).as_ref()));
    }
    writer
        .write_event(Event::Empty(element))
        .with_context(|| format!("Failed to write {} element", name))
}

/// Writes `<name attrs...>text</name>`.
fn text_element(
    writer: &mut XmlWriter,
    name: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    start(writer, name, attrs)?;
    writer
        .write_event(Event::Text(BytesText::new(&strip_xml_invalid_chars(text))))
        .with_context(|| format!("Failed to write {} text", name))?;
    end(writer, name)
}
