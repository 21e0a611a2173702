//! Atom 1.0 feed generation.

use super::write_content;
use crate::{
    error::FeedError,
    feed::{FeedDocument, FeedItem},
    utils::xml::XmlWriter,
};

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Build the Atom 1.0 document as compact markup.
pub fn build_atom(doc: &FeedDocument) -> Result<String, FeedError> {
    AtomFeed::new(doc).into_xml()
}

struct AtomFeed<'a> {
    doc: &'a FeedDocument,
    escape_content: bool,
}

impl<'a> AtomFeed<'a> {
    fn new(doc: &'a FeedDocument) -> Self {
        Self {
            doc,
            escape_content: doc.config().escape_content,
        }
    }

    fn into_xml(self) -> Result<String, FeedError> {
        let doc = self.doc;
        let mut w = XmlWriter::new();

        w.open("feed", &[("xmlns", Some(ATOM_NS))])?;
        w.text("title", doc.title())?;
        w.empty("link", &[("href", Some(doc.link())), ("rel", Some("self"))])?;
        w.text("id", doc.link())?;
        w.text("updated", &doc.last_build_date().to_rfc3339())?;
        if !doc.description().is_empty() {
            w.text("subtitle", doc.description())?;
        }
        if let Some(editor) = doc.managing_editor() {
            w.open("author", &[])?;
            w.text("email", editor)?;
            w.close();
        }
        w.text_opt("rights", doc.copyright())?;
        w.text_with(
            "generator",
            &[("version", Some(doc.config().version.as_str()))],
            doc.generator(),
        )?;

        for item in doc.items() {
            self.write_entry(&mut w, item)?;
        }
        Ok(w.finish())
    }

    fn write_entry(&self, w: &mut XmlWriter, item: &FeedItem) -> Result<(), FeedError> {
        w.open("entry", &[])?;

        w.text("title", item.title())?;
        w.empty("link", &[("href", Some(item.link()))])?;
        w.text("id", item.guid())?;
        w.text("updated", &item.pubdate().to_rfc3339())?;

        // Unescaped markup must be flagged as html for Atom readers
        let summary_type = (!self.escape_content).then_some("html");
        write_content(
            w,
            "summary",
            &[("type", summary_type)],
            item.description(),
            self.escape_content,
        )?;

        if let Some(author) = item.author() {
            w.open("author", &[])?;
            w.text("name", author)?;
            w.close();
        }
        for category in item.categories() {
            w.empty("category", &[("term", Some(category.as_str()))])?;
        }

        w.close();
        Ok(())
    }
}
