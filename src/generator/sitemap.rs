//! Sitemap generation.
//!
//! Emits one `<url>` per item for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01T00:00:00Z</lastmod>
//!   </url>
//! </urlset>
//! ```
//!
//! The image, video, news and xhtml namespaces are declared only when at
//! least one item uses them.

use crate::{
    error::FeedError,
    feed::{FeedDocument, FeedItem, Image, News, Translation, Video},
    utils::xml::XmlWriter,
};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";
const VIDEO_NS: &str = "http://www.google.com/schemas/sitemap-video/1.1";
const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Build the sitemap as compact markup.
pub fn build_sitemap(doc: &FeedDocument) -> Result<String, FeedError> {
    let items = doc.items();
    let uses = |pred: fn(&FeedItem) -> bool| items.iter().any(pred);

    let mut w = XmlWriter::new();
    w.open(
        "urlset",
        &[
            ("xmlns", Some(SITEMAP_NS)),
            ("xmlns:image", uses(|i| !i.images().is_empty()).then_some(IMAGE_NS)),
            ("xmlns:video", uses(|i| !i.videos().is_empty()).then_some(VIDEO_NS)),
            ("xmlns:news", uses(|i| i.news().is_some()).then_some(NEWS_NS)),
            ("xmlns:xhtml", uses(|i| !i.translations().is_empty()).then_some(XHTML_NS)),
        ],
    )?;

    for item in items {
        write_url(&mut w, item)?;
    }
    Ok(w.finish())
}

fn write_url(w: &mut XmlWriter, item: &FeedItem) -> Result<(), FeedError> {
    w.open("url", &[])?;

    w.text("loc", item.link())?;
    w.text("lastmod", &item.pubdate().to_rfc3339())?;
    if let Some(freq) = item.change_frequency() {
        w.text("changefreq", freq.as_str())?;
    }
    if let Some(priority) = item.priority() {
        w.text("priority", &format!("{priority:.1}"))?;
    }

    for translation in item.translations() {
        write_alternate(w, translation)?;
    }
    for image in item.images() {
        write_image(w, image)?;
    }
    for video in item.videos() {
        write_video(w, video)?;
    }
    if let Some(news) = item.news() {
        write_news(w, news)?;
    }

    w.close();
    Ok(())
}

fn write_alternate(w: &mut XmlWriter, translation: &Translation) -> Result<(), FeedError> {
    w.empty(
        "xhtml:link",
        &[
            ("rel", Some("alternate")),
            ("hreflang", Some(translation.language.as_str())),
            ("href", Some(translation.url.as_str())),
        ],
    )
}

fn write_image(w: &mut XmlWriter, image: &Image) -> Result<(), FeedError> {
    w.open("image:image", &[])?;
    w.text("image:loc", &image.url)?;
    w.text_opt("image:caption", image.caption.as_deref())?;
    w.text_opt("image:geo_location", image.geo_location.as_deref())?;
    w.text_opt("image:title", image.title.as_deref())?;
    w.text_opt("image:license", image.license.as_deref())?;
    w.close();
    Ok(())
}

fn write_video(w: &mut XmlWriter, video: &Video) -> Result<(), FeedError> {
    w.open("video:video", &[])?;
    w.text("video:thumbnail_loc", &video.thumbnail_url)?;
    w.text("video:title", &video.title)?;
    w.text("video:description", &video.description)?;
    w.text("video:content_loc", &video.content_url)?;
    if let Some(duration) = video.duration {
        w.text("video:duration", &duration.to_string())?;
    }
    if let Some(rating) = video.rating {
        w.text("video:rating", &format!("{rating:.1}"))?;
    }
    if let Some(views) = video.view_count {
        w.text("video:view_count", &views.to_string())?;
    }
    w.text_opt("video:publication_date", video.publication_date.as_deref())?;
    if let Some(family_friendly) = video.family_friendly {
        w.text("video:family_friendly", if family_friendly { "yes" } else { "no" })?;
    }
    for tag in &video.tags {
        w.text("video:tag", tag)?;
    }
    w.close();
    Ok(())
}

fn write_news(w: &mut XmlWriter, news: &News) -> Result<(), FeedError> {
    w.open("news:news", &[])?;
    w.open("news:publication", &[])?;
    w.text("news:name", &news.sitename)?;
    w.text("news:language", &news.language)?;
    w.close();
    w.text("news:publication_date", &news.publication_date)?;
    w.text("news:title", &news.title)?;
    w.text_opt("news:keywords", news.keywords.as_deref())?;
    w.close();
    Ok(())
}
