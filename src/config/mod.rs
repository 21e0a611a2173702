//! Feed configuration and the `feed.toml` definition file.
//!
//! # Sections
//!
//! | Section      | Purpose                                            |
//! |--------------|----------------------------------------------------|
//! | `[config]`   | `FeedConfig`: resolution, validation, output knobs |
//! | `[channel]`  | Feed metadata (title, link, description, ...)      |
//! | `[[items]]`  | One table per entry, in render order               |
//!
//! Unknown keys never fail a load; they are collected and reported.

mod error;

pub use error::ConfigError;

use crate::{
    feed::{FeedDocument, ItemData},
    log,
    utils::date::DateFormat,
};
use serde::Deserialize;
use std::{fs, path::Path};

/// Default upper bound on items per document before splitting.
pub const DEFAULT_MAX_ITEMS: usize = 50_000;

/// Default upper bound on estimated document size (50 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

// ============================================================================
// FeedConfig
// ============================================================================

/// Options fixed at construction of a `FeedDocument`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Prefix for relative URLs in items.
    pub base_url: Option<String>,
    /// Validate every item on insertion.
    pub validate: bool,
    /// Escape free-form content; when off it is wrapped in CDATA instead.
    pub escape_content: bool,
    /// Re-indent rendered markup.
    pub pretty_print: bool,
    /// Format of `FeedDocument::last_build_date_string`.
    pub date_format: DateFormat,
    /// Initial channel language.
    pub language: Option<String>,
    pub max_items: usize,
    /// Bytes.
    pub max_file_size: u64,
    /// Host suffixes every URL must belong to. Empty means unrestricted.
    pub allowed_domains: Vec<String>,
    /// Version embedded in the generator tag.
    pub version: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            validate: false,
            escape_content: true,
            pretty_print: true,
            date_format: DateFormat::default(),
            language: None,
            max_items: DEFAULT_MAX_ITEMS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_domains: Vec::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl FeedConfig {
    /// Parse from a TOML table. Unknown keys are ignored.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = parse_with_ignored::<Self>(content)?;
        report_ignored(&ignored);
        Ok(config)
    }
}

// ============================================================================
// FeedFile
// ============================================================================

/// Channel metadata as written in `[channel]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: Option<String>,
    pub copyright: Option<String>,
    pub managing_editor: Option<String>,
    pub web_master: Option<String>,
    pub category: Option<String>,
    pub generator: Option<String>,
    pub docs: Option<String>,
}

/// A complete feed definition file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedFile {
    pub config: FeedConfig,
    pub channel: ChannelConfig,
    pub items: Vec<ItemData>,
}

impl FeedFile {
    /// Load a feed definition, reporting unknown keys.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::parse(&content)
    }

    /// Parse a feed definition from TOML text, reporting unknown keys.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let (file, ignored) = parse_with_ignored::<Self>(content)?;
        report_ignored(&ignored);
        Ok(file)
    }

    /// Build the document: apply `[channel]`, then insert items in order.
    ///
    /// Items go through `add_item` one at a time, so with `validate = true`
    /// a rejected item stops the load and the error names its position.
    pub fn into_document(self) -> Result<FeedDocument, ConfigError> {
        let Self {
            config,
            channel,
            items,
        } = self;

        let mut doc = FeedDocument::new(config);
        doc.set_title(channel.title)
            .set_description(channel.description)
            .set_link(channel.link);

        if let Some(language) = channel.language {
            doc.set_language(language);
        }
        if let Some(copyright) = channel.copyright {
            doc.set_copyright(copyright);
        }
        if let Some(editor) = channel.managing_editor {
            doc.set_managing_editor(editor);
        }
        if let Some(web_master) = channel.web_master {
            doc.set_web_master(web_master);
        }
        if let Some(category) = channel.category {
            doc.set_category(category);
        }
        if let Some(generator) = channel.generator {
            doc.set_generator(generator);
        }
        if let Some(docs) = channel.docs {
            doc.set_docs(docs);
        }

        for (index, item) in items.into_iter().enumerate() {
            doc.add_item(item)
                .map_err(|source| ConfigError::Item { index, source })?;
        }

        Ok(doc)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse TOML content, collecting any unknown fields.
fn parse_with_ignored<T>(content: &str) -> Result<(T, Vec<String>), ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut ignored = Vec::new();
    let deserializer = toml::Deserializer::new(content);
    let parsed = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
        ignored.push(path.to_string());
    })?;
    Ok((parsed, ignored))
}

fn report_ignored(fields: &[String]) {
    if fields.is_empty() {
        return;
    }
    log!("config"; "ignoring unknown fields: {}", fields.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedFormat;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.base_url, None);
        assert!(!config.validate);
        assert!(config.escape_content);
        assert!(config.pretty_print);
        assert_eq!(config.max_items, 50_000);
        assert_eq!(config.max_file_size, 52_428_800);
        assert!(config.allowed_domains.is_empty());
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = FeedConfig::from_toml(
            "base_url = \"https://ex.com\"\nvalidate = true\nmax_items = 10\ndate_format = \"rfc3339\"",
        )
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://ex.com"));
        assert!(config.validate);
        assert_eq!(config.max_items, 10);
        assert_eq!(config.date_format, DateFormat::Rfc3339);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (config, ignored) =
            parse_with_ignored::<FeedConfig>("validate = true\ncolour = \"blue\"").unwrap();
        assert!(config.validate);
        assert_eq!(ignored, vec!["colour".to_string()]);
    }

    #[test]
    fn test_negative_numbers_rejected() {
        assert!(matches!(
            FeedConfig::from_toml("max_items = -1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_feed_file_into_document() {
        let file = FeedFile::parse(
            r#"
            [config]
            base_url = "https://ex.com"

            [channel]
            title = "T"
            description = "D"
            link = "https://ex.com"
            copyright = "(c) ex"

            [[items]]
            title = "A"
            description = "B"
            link = "/a"

            [[items]]
            title = "C"
            description = "D"
            link = "https://ex.com/c"
            "#,
        )
        .unwrap();

        let doc = file.into_document().unwrap();
        assert_eq!(doc.title(), "T");
        assert_eq!(doc.copyright(), Some("(c) ex"));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.items()[0].link(), "https://ex.com/a");

        let xml = doc.render(FeedFormat::Rss).unwrap();
        assert!(xml.contains("<title>T</title>"));
    }

    #[test]
    fn test_feed_file_reports_rejected_item_index() {
        let file = FeedFile::parse(
            r#"
            [config]
            validate = true

            [[items]]
            title = "A"
            description = "B"
            link = "https://ex.com/a"

            [[items]]
            description = "no title"
            link = "https://ex.com/b"
            "#,
        )
        .unwrap();

        let err = file.into_document().unwrap_err();
        assert!(matches!(err, ConfigError::Item { index: 1, .. }));
        assert!(err.to_string().contains("items[1]"));
    }

    #[test]
    fn test_load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "[channel]\ntitle = \"From disk\"").unwrap();

        let file = FeedFile::load(tmp.path()).unwrap();
        assert_eq!(file.channel.title, "From disk");
        assert!(file.items.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = FeedFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(p, _) if p == path));
    }
}
