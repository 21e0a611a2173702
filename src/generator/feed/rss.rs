//! RSS 2.0 feed generation.
//!
//! Extensions are declared on `<rss>` only when some item needs them:
//! Media RSS for images and videos, Google News for keywords.

use super::write_content;
use crate::{
    error::FeedError,
    feed::{Enclosure, FeedDocument, FeedItem, Image, Video},
    utils::xml::XmlWriter,
};

pub const MEDIA_NS: &str = "http://search.yahoo.com/mrss/";
pub const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";

/// Build the RSS 2.0 document as compact markup.
pub fn build_rss(doc: &FeedDocument) -> Result<String, FeedError> {
    RssFeed::new(doc).into_xml()
}

struct RssFeed<'a> {
    doc: &'a FeedDocument,
    escape_content: bool,
}

impl<'a> RssFeed<'a> {
    fn new(doc: &'a FeedDocument) -> Self {
        Self {
            doc,
            escape_content: doc.config().escape_content,
        }
    }

    fn into_xml(self) -> Result<String, FeedError> {
        let items = self.doc.items();
        let has_media = items.iter().any(FeedItem::has_media);
        let has_news = items.iter().any(|item| item.news().is_some());

        let mut w = XmlWriter::new();
        w.open(
            "rss",
            &[
                ("version", Some("2.0")),
                ("xmlns:media", has_media.then_some(MEDIA_NS)),
                ("xmlns:news", has_news.then_some(NEWS_NS)),
            ],
        )?;
        w.open("channel", &[])?;
        self.write_channel(&mut w)?;
        for item in items {
            self.write_item(&mut w, item)?;
        }
        Ok(w.finish())
    }

    fn write_channel(&self, w: &mut XmlWriter) -> Result<(), FeedError> {
        let doc = self.doc;

        w.text("title", doc.title())?;
        w.text("link", doc.link())?;
        w.text("description", doc.description())?;
        w.text_opt("language", doc.language())?;
        w.text_opt("managingEditor", doc.managing_editor())?;
        w.text_opt("webMaster", doc.web_master())?;
        w.text_opt("category", doc.category())?;
        w.text_opt("copyright", doc.copyright())?;
        w.text("lastBuildDate", &doc.last_build_date().to_rfc2822())?;
        w.text(
            "generator",
            &format!("{} v{}", doc.generator(), doc.config().version),
        )?;
        w.text_opt("docs", doc.docs())
    }

    fn write_item(&self, w: &mut XmlWriter, item: &FeedItem) -> Result<(), FeedError> {
        w.open("item", &[])?;

        w.text("title", item.title())?;
        w.text("link", item.link())?;
        write_content(w, "description", &[], item.description(), self.escape_content)?;
        w.text_opt("author", item.author())?;
        for category in item.categories() {
            w.text("category", category)?;
        }
        w.text("pubDate", &item.pubdate().to_rfc2822())?;
        w.text("guid", item.guid())?;

        if let Some(enclosure) = item.enclosure() {
            write_enclosure(w, enclosure)?;
        }
        for image in item.images() {
            write_image(w, image)?;
        }
        for video in item.videos() {
            write_video(w, video)?;
        }
        if let Some(keywords) = item.news().and_then(|news| news.keywords.as_deref()) {
            w.text("news:keywords", keywords)?;
        }

        w.close();
        Ok(())
    }
}

fn write_enclosure(w: &mut XmlWriter, enclosure: &Enclosure) -> Result<(), FeedError> {
    let length = enclosure.length.map(|len| len.to_string());
    w.empty(
        "enclosure",
        &[
            ("url", Some(enclosure.url.as_str())),
            ("type", Some(enclosure.mime_type.as_str())),
            ("length", length.as_deref()),
        ],
    )
}

fn write_image(w: &mut XmlWriter, image: &Image) -> Result<(), FeedError> {
    let width = image.width.map(|v| v.to_string());
    let height = image.height.map(|v| v.to_string());
    w.empty(
        "media:content",
        &[
            ("url", Some(image.url.as_str())),
            ("type", image.mime_type.as_deref()),
            ("width", width.as_deref()),
            ("height", height.as_deref()),
        ],
    )
}

fn write_video(w: &mut XmlWriter, video: &Video) -> Result<(), FeedError> {
    let duration = video.duration.map(|secs| secs.to_string());
    w.open(
        "media:content",
        &[
            ("url", Some(video.content_url.as_str())),
            ("type", Some("video")),
            ("duration", duration.as_deref()),
        ],
    )?;
    w.empty("media:thumbnail", &[("url", Some(video.thumbnail_url.as_str()))])?;
    w.close();
    Ok(())
}
