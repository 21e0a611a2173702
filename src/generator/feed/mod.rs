//! Syndication feeds (RSS, Atom).
//!
//! - **RSS 2.0**: channel + items, with Media RSS and Google News extensions
//! - **Atom 1.0**: feed + entries

pub mod atom;
pub mod rss;

use crate::{error::FeedError, utils::xml::XmlWriter};

/// Write a free-form content element.
///
/// Escaped text by default; a CDATA section when `escape_content` is off.
fn write_content(
    w: &mut XmlWriter,
    name: &str,
    attrs: &[(&str, Option<&str>)],
    text: &str,
    escape_content: bool,
) -> Result<(), FeedError> {
    if escape_content {
        w.text_with(name, attrs, text)
    } else {
        w.cdata_with(name, attrs, text)
    }
}
