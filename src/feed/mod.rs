//! The feed aggregate.
//!
//! `FeedDocument` owns channel metadata and an ordered list of entries.
//! Insertion order is render order; nothing is sorted implicitly.
//!
//! ```ignore
//! let mut doc = FeedDocument::new(FeedConfig::default());
//! doc.set_title("T").set_description("D").set_link("https://ex.com");
//! doc.add_item(ItemData::new("A", "B", "https://ex.com/a"))?;
//! let xml = doc.render(FeedFormat::Rss)?;
//! ```

mod item;
mod stats;
mod url;

pub use crate::generator::FeedFormat;
pub use item::{
    CategoryField, ChangeFrequency, Enclosure, FeedItem, Image, ItemData, News, Translation,
    Video,
};
pub use stats::{BASE_SIZE_ESTIMATE, FeedStats, ITEM_SIZE_ESTIMATE};
pub use url::{is_absolute, resolve_url};

use crate::{
    config::FeedConfig,
    debug,
    error::FeedError,
    generator,
    utils::date::DateTimeUtc,
    validate::{ValidationError, ValidationFailure, check_required, validate_item},
};

/// Generator name used when none is set.
pub const DEFAULT_GENERATOR: &str = "feedkit";

#[derive(Debug, Clone)]
pub struct FeedDocument {
    config: FeedConfig,
    title: String,
    description: String,
    link: String,
    language: Option<String>,
    copyright: Option<String>,
    managing_editor: Option<String>,
    web_master: Option<String>,
    category: Option<String>,
    generator: String,
    docs: Option<String>,
    last_build_date: DateTimeUtc,
    items: Vec<FeedItem>,
}

impl FeedDocument {
    /// Create an empty document. The channel language starts as
    /// `config.language`.
    pub fn new(config: FeedConfig) -> Self {
        Self {
            language: config.language.clone(),
            config,
            title: String::new(),
            description: String::new(),
            link: String::new(),
            copyright: None,
            managing_editor: None,
            web_master: None,
            category: None,
            generator: DEFAULT_GENERATOR.to_string(),
            docs: None,
            last_build_date: DateTimeUtc::now(),
            items: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Metadata setters
    // ------------------------------------------------------------------------

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self.touch()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self.touch()
    }

    pub fn set_link(&mut self, link: impl Into<String>) -> &mut Self {
        self.link = link.into();
        self.touch()
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> &mut Self {
        self.language = Some(language.into());
        self.touch()
    }

    pub fn set_copyright(&mut self, copyright: impl Into<String>) -> &mut Self {
        self.copyright = Some(copyright.into());
        self.touch()
    }

    pub fn set_managing_editor(&mut self, editor: impl Into<String>) -> &mut Self {
        self.managing_editor = Some(editor.into());
        self.touch()
    }

    pub fn set_web_master(&mut self, web_master: impl Into<String>) -> &mut Self {
        self.web_master = Some(web_master.into());
        self.touch()
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> &mut Self {
        self.category = Some(category.into());
        self.touch()
    }

    pub fn set_generator(&mut self, generator: impl Into<String>) -> &mut Self {
        self.generator = generator.into();
        self.touch()
    }

    /// URL of the format documentation (RSS `<docs>`).
    pub fn set_docs(&mut self, docs: impl Into<String>) -> &mut Self {
        self.docs = Some(docs.into());
        self.touch()
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    /// Insert one item at the end.
    ///
    /// With `config.validate` set, the raw data is checked first and any
    /// violation rejects the item as a whole.
    pub fn add_item(&mut self, data: ItemData) -> Result<&mut Self, FeedError> {
        if self.config.validate {
            let errors = validate_item(&data, &self.config.allowed_domains);
            if !errors.is_empty() {
                debug!("feed"; "rejected item `{}`: {} errors", data.link, errors.len());
                return Err(ValidationFailure::new(errors).into());
            }
        }

        let now = DateTimeUtc::now();
        let item = FeedItem::from_data(data, self.config.base_url.as_deref(), now)?;
        debug!("feed"; "added item #{} {}", self.items.len(), item.link());

        self.items.push(item);
        self.last_build_date = now;
        Ok(self)
    }

    /// Insert items in order.
    ///
    /// Not transactional: on failure, items before the failing one stay
    /// inserted.
    pub fn add_items<I>(&mut self, items: I) -> Result<&mut Self, FeedError>
    where
        I: IntoIterator<Item = ItemData>,
    {
        for data in items {
            self.add_item(data)?;
        }
        Ok(self)
    }

    /// Drop every item matching `predicate`. Returns how many were removed.
    pub fn remove_items<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&FeedItem) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        let removed = before - self.items.len();
        debug!("feed"; "removed {} items", removed);
        self.touch();
        removed
    }

    pub fn clear(&mut self) -> &mut Self {
        self.items.clear();
        self.touch()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Check the channel and every item. Never fails; an empty list means valid.
    ///
    /// Channel fields come first, then item errors with paths prefixed by
    /// `items[<index>]`.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_required(&mut errors, "title", &self.title);
        check_required(&mut errors, "description", &self.description);
        check_required(&mut errors, "link", &self.link);

        for (index, item) in self.items.iter().enumerate() {
            let prefix = format!("items[{index}]");
            errors.extend(
                validate_item(item, &self.config.allowed_domains)
                    .into_iter()
                    .map(|err| err.with_prefix(&prefix)),
            );
        }
        errors
    }

    /// Render to a complete XML document.
    pub fn render(&self, format: FeedFormat) -> Result<String, FeedError> {
        generator::render(self, format)
    }

    /// Render from a format name (`rss`, `atom`, `sitemap`).
    pub fn render_str(&self, format: &str) -> Result<String, FeedError> {
        self.render(format.parse()?)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    pub fn managing_editor(&self) -> Option<&str> {
        self.managing_editor.as_deref()
    }

    pub fn web_master(&self) -> Option<&str> {
        self.web_master.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    pub fn docs(&self) -> Option<&str> {
        self.docs.as_deref()
    }

    pub fn last_build_date(&self) -> DateTimeUtc {
        self.last_build_date
    }

    /// `last_build_date` in the configured `date_format`.
    pub fn last_build_date_string(&self) -> String {
        self.config.date_format.format(self.last_build_date)
    }

    fn touch(&mut self) -> &mut Self {
        self.last_build_date = DateTimeUtc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ErrorKind;

    fn make_doc(config: FeedConfig) -> FeedDocument {
        let mut doc = FeedDocument::new(config);
        doc.set_title("T")
            .set_description("D")
            .set_link("https://ex.com");
        doc
    }

    fn item(title: &str, link: &str) -> ItemData {
        ItemData::new(title, "B", link)
    }

    fn validating() -> FeedConfig {
        FeedConfig {
            validate: true,
            ..FeedConfig::default()
        }
    }

    #[test]
    fn test_new_document_is_empty() {
        let doc = FeedDocument::new(FeedConfig {
            language: Some("en".to_string()),
            ..FeedConfig::default()
        });
        assert!(doc.is_empty());
        assert_eq!(doc.language(), Some("en"));
        assert_eq!(doc.generator(), DEFAULT_GENERATOR);
        assert_eq!(doc.title(), "");
    }

    #[test]
    fn test_setters_chain() {
        let mut doc = FeedDocument::new(FeedConfig::default());
        doc.set_title("T")
            .set_description("D")
            .set_link("https://ex.com")
            .set_language("de")
            .set_copyright("c")
            .set_managing_editor("ed@ex.com")
            .set_web_master("wm@ex.com")
            .set_category("tech")
            .set_generator("gen")
            .set_docs("https://www.rssboard.org/rss-specification");

        assert_eq!(doc.title(), "T");
        assert_eq!(doc.language(), Some("de"));
        assert_eq!(doc.managing_editor(), Some("ed@ex.com"));
        assert_eq!(doc.web_master(), Some("wm@ex.com"));
        assert_eq!(doc.category(), Some("tech"));
        assert_eq!(doc.generator(), "gen");
        assert!(doc.docs().is_some());
    }

    #[test]
    fn test_add_item_preserves_insertion_order() {
        let mut doc = make_doc(FeedConfig::default());
        doc.add_item(item("Z", "https://ex.com/z"))
            .unwrap()
            .add_item(item("A", "https://ex.com/a"))
            .unwrap();

        let titles: Vec<_> = doc.items().iter().map(FeedItem::title).collect();
        assert_eq!(titles, ["Z", "A"]);
    }

    #[test]
    fn test_missing_pubdate_is_insertion_time() {
        let mut doc = make_doc(FeedConfig::default());
        let before = DateTimeUtc::now();
        doc.add_item(item("A", "https://ex.com/a")).unwrap();
        let after = DateTimeUtc::now();

        let pubdate = doc.items()[0].pubdate();
        assert!(before <= pubdate && pubdate <= after);
        assert!(before <= doc.last_build_date() && doc.last_build_date() <= after);
    }

    #[test]
    fn test_remove_and_clear_refresh_build_date() {
        let stale = DateTimeUtc::new(2000, 1, 1, 0, 0, 0);
        let mut doc = make_doc(FeedConfig::default());
        doc.add_items([item("A", "https://ex.com/a"), item("B", "https://ex.com/b")])
            .unwrap();

        doc.last_build_date = stale;
        let before = DateTimeUtc::now();
        assert_eq!(doc.remove_items(|it| it.title() == "A"), 1);
        let after = DateTimeUtc::now();
        assert!(before <= doc.last_build_date() && doc.last_build_date() <= after);

        // A predicate matching nothing still counts as a modification
        doc.last_build_date = stale;
        assert_eq!(doc.remove_items(|_| false), 0);
        assert_ne!(doc.last_build_date(), stale);

        doc.last_build_date = stale;
        let before = DateTimeUtc::now();
        doc.clear();
        let after = DateTimeUtc::now();
        assert!(doc.is_empty());
        assert!(before <= doc.last_build_date() && doc.last_build_date() <= after);
    }

    #[test]
    fn test_eager_validation_rejects_whole_item() {
        let mut doc = make_doc(validating());
        let err = doc.add_item(item("", "https://ex.com/a")).unwrap_err();

        let FeedError::Validation(failure) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(failure.errors.len(), 1);
        assert_eq!(failure.errors[0].field, "title");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_eager_validation_collects_all_messages() {
        let mut doc = make_doc(validating());
        let err = doc.add_item(ItemData::new("", "", "nope")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: title is required; description is required; \
             link must be a valid http(s) URL"
        );
    }

    #[test]
    fn test_no_validation_accepts_anything() {
        let mut doc = make_doc(FeedConfig::default());
        doc.add_item(ItemData::default()).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_allowed_domains_on_insert() {
        let mut doc = make_doc(FeedConfig {
            validate: true,
            allowed_domains: vec!["example.com".to_string()],
            ..FeedConfig::default()
        });

        let err = doc.add_item(item("A", "https://blocked.com/x")).unwrap_err();
        let FeedError::Validation(failure) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(failure.errors[0].kind, ErrorKind::DomainNotAllowed);

        doc.add_item(item("A", "https://example.com/x")).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_add_items_is_not_transactional() {
        let mut doc = make_doc(validating());
        let result = doc.add_items(vec![
            item("A", "https://ex.com/a"),
            item("B", "https://ex.com/b"),
            item("", "https://ex.com/c"),
            item("D", "https://ex.com/d"),
        ]);

        assert!(result.is_err());
        // Items before the failing one stay, the rest are never attempted
        let titles: Vec<_> = doc.items().iter().map(FeedItem::title).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn test_add_item_bad_date() {
        let mut doc = make_doc(FeedConfig::default());
        let data = ItemData {
            pubdate: Some("not a date".into()),
            ..item("A", "https://ex.com/a")
        };
        let err = doc.add_item(data).unwrap_err();
        assert!(matches!(err, FeedError::Date(_)));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_relative_link_resolved_then_domain_checked() {
        let mut doc = make_doc(FeedConfig {
            base_url: Some("https://example.com/".to_string()),
            allowed_domains: vec!["example.com".to_string()],
            ..FeedConfig::default()
        });
        doc.add_item(item("A", "posts/a")).unwrap();

        assert_eq!(doc.items()[0].link(), "https://example.com/posts/a");
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_remove_items_and_clear() {
        let mut doc = make_doc(FeedConfig::default());
        doc.add_items(["a", "b", "c"].map(|t| item(t, &format!("https://ex.com/{t}"))))
            .unwrap();

        let removed = doc.remove_items(|it| it.title() == "b");
        assert_eq!(removed, 1);
        let titles: Vec<_> = doc.items().iter().map(FeedItem::title).collect();
        assert_eq!(titles, ["a", "c"]);

        doc.clear();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_feed_validate_prefixes_item_paths() {
        let mut doc = FeedDocument::new(FeedConfig::default());
        doc.set_link("not a url but present");
        doc.add_item(item("A", "https://ex.com/a")).unwrap();
        doc.add_item(ItemData {
            images: vec![Image::new("bad")],
            ..item("", "https://ex.com/b")
        })
        .unwrap();

        let errors = doc.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["title", "description", "items[1].title", "items[1].images[0].url"]
        );
    }

    #[test]
    fn test_validate_valid_feed() {
        let mut doc = make_doc(FeedConfig::default());
        doc.add_item(item("A", "https://ex.com/a")).unwrap();
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_render_str_rejects_unknown_format() {
        let doc = make_doc(FeedConfig::default());
        let err = doc.render_str("json").unwrap_err();
        assert_eq!(err, FeedError::UnsupportedFormat("json".to_string()));
    }

    #[test]
    fn test_last_build_date_string_follows_config() {
        let doc = make_doc(FeedConfig {
            date_format: crate::utils::date::DateFormat::Rfc3339,
            ..FeedConfig::default()
        });
        assert_eq!(
            doc.last_build_date_string(),
            doc.last_build_date().to_rfc3339()
        );
    }
}
