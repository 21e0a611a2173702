//! Markup generators.
//!
//! Renders a `FeedDocument` into one of three XML dialects:
//!
//! - **Feed**: RSS 2.0 or Atom 1.0 for feed readers
//! - **Sitemap**: search engine indexing with image/video/news extensions
//!
//! Generators write compact markup through `XmlWriter`; `render` re-indents
//! it afterwards when `pretty_print` is set.

pub mod feed;
pub mod sitemap;

use crate::{debug, error::FeedError, feed::FeedDocument, utils::xml::format_xml};
use std::{fmt, str::FromStr};

/// Output dialect selected at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeedFormat {
    #[default]
    Rss,
    Atom,
    Sitemap,
}

impl FeedFormat {
    pub const ALL: [Self; 3] = [Self::Rss, Self::Atom, Self::Sitemap];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rss => "rss",
            Self::Atom => "atom",
            Self::Sitemap => "sitemap",
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFormat {
    type Err = FeedError;

    /// Accepts the exact lowercase names only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| FeedError::UnsupportedFormat(s.to_string()))
    }
}

/// Render `doc` in `format`, re-indenting when `pretty_print` is set.
pub(crate) fn render(doc: &FeedDocument, format: FeedFormat) -> Result<String, FeedError> {
    let xml = match format {
        FeedFormat::Rss => feed::rss::build_rss(doc)?,
        FeedFormat::Atom => feed::atom::build_atom(doc)?,
        FeedFormat::Sitemap => sitemap::build_sitemap(doc)?,
    };

    debug!("render"; "{} with {} items ({} bytes raw)", format, doc.len(), xml.len());

    Ok(if doc.config().pretty_print {
        format_xml(&xml)
    } else {
        xml
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        config::FeedConfig,
        feed::{FeedDocument, ItemData},
    };
    use quick_xml::{Reader, events::Event};

    /// Walk the whole document with a strict reader.
    pub(crate) fn assert_well_formed(xml: &str) {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().check_end_names = true;
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => panic!("malformed XML at {}: {err}\n{xml}", reader.buffer_position()),
            }
        }
    }

    pub(crate) fn sample_doc(config: FeedConfig) -> FeedDocument {
        let mut doc = FeedDocument::new(config);
        doc.set_title("T")
            .set_description("D")
            .set_link("https://ex.com");
        doc.add_item(ItemData::new("A", "B", "https://ex.com/a"))
            .unwrap();
        doc
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("rss".parse::<FeedFormat>().unwrap(), FeedFormat::Rss);
        assert_eq!("atom".parse::<FeedFormat>().unwrap(), FeedFormat::Atom);
        assert_eq!("sitemap".parse::<FeedFormat>().unwrap(), FeedFormat::Sitemap);
        assert_eq!(
            "json".parse::<FeedFormat>().unwrap_err(),
            FeedError::UnsupportedFormat("json".to_string())
        );
    }

    #[test]
    fn test_format_from_str_is_exact() {
        for token in ["RSS", "Atom", " sitemap ", ""] {
            assert_eq!(
                token.parse::<FeedFormat>().unwrap_err(),
                FeedError::UnsupportedFormat(token.to_string())
            );
        }
    }

    #[test]
    fn test_format_display_round_trips() {
        for format in FeedFormat::ALL {
            assert_eq!(format.to_string().parse::<FeedFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_render_str_rejects_unknown_format() {
        let doc = sample_doc(FeedConfig::default());
        let err = doc.render_str("json").unwrap_err();
        assert!(matches!(err, FeedError::UnsupportedFormat(ref s) if s == "json"));
    }

    #[test]
    fn test_every_format_is_well_formed() {
        for pretty_print in [true, false] {
            let doc = sample_doc(FeedConfig {
                pretty_print,
                ..FeedConfig::default()
            });
            for format in FeedFormat::ALL {
                let xml = doc.render(format).unwrap();
                assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
                assert_well_formed(&xml);
            }
        }
    }

    /// Non-blank text and CDATA nodes, in document order.
    fn text_nodes(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut nodes = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Eof => break,
                Event::Text(text) => nodes.push(String::from_utf8_lossy(&text).into_owned()),
                Event::CData(data) => nodes.push(String::from_utf8_lossy(&data).into_owned()),
                _ => {}
            }
        }
        nodes.retain(|node| !node.trim().is_empty());
        nodes
    }

    #[test]
    fn test_pretty_print_keeps_text_nodes() {
        for escape_content in [true, false] {
            let mut doc = FeedDocument::new(FeedConfig {
                pretty_print: false,
                escape_content,
                ..FeedConfig::default()
            });
            doc.set_title("  Padded  ")
                .set_description("D")
                .set_link("https://ex.com");
            doc.add_item(ItemData::new(" A ", "  body\n  ", "https://ex.com/a"))
                .unwrap();

            for format in FeedFormat::ALL {
                let raw = doc.render(format).unwrap();
                let pretty = format_xml(&raw);
                assert_eq!(text_nodes(&raw), text_nodes(&pretty), "{format}");
            }
            let pretty = format_xml(&doc.render(FeedFormat::Rss).unwrap());
            assert!(pretty.contains("\n    <title>  Padded  </title>\n"));
        }
    }

    #[test]
    fn test_pretty_print_toggle() {
        let compact = sample_doc(FeedConfig {
            pretty_print: false,
            ..FeedConfig::default()
        })
        .render(FeedFormat::Rss)
        .unwrap();
        assert!(!compact.contains('\n'));

        let pretty = sample_doc(FeedConfig::default())
            .render(FeedFormat::Rss)
            .unwrap();
        assert!(pretty.contains("\n  <channel>\n"));
        assert!(pretty.contains("\n    <title>T</title>\n"));
    }
}
