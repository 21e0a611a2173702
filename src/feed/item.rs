//! Feed entries: caller input (`ItemData`) and stored value (`FeedItem`).

use super::url::resolve_url;
use crate::{
    utils::date::{DateError, DateInput, DateTimeUtc},
    validate::Validatable,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Nested values
// ============================================================================

/// Attached media file (podcast episode, download).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enclosure {
    pub url: String,
    #[serde(alias = "type")]
    pub mime_type: String,
    /// Size in bytes
    pub length: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    #[serde(alias = "type")]
    pub mime_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub license: Option<String>,
    pub geo_location: Option<String>,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub content_url: String,
    /// Length in seconds
    pub duration: Option<u32>,
    pub rating: Option<f32>,
    pub view_count: Option<u64>,
    pub publication_date: Option<String>,
    pub family_friendly: Option<bool>,
    pub tags: Vec<String>,
}

/// Alternate-language version of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translation {
    #[serde(alias = "language_code")]
    pub language: String,
    pub url: String,
}

impl Translation {
    pub fn new(language: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            url: url.into(),
        }
    }
}

/// News publication annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct News {
    pub sitename: String,
    #[serde(alias = "language_code")]
    pub language: String,
    pub publication_date: String,
    pub title: String,
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// A single category or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    One(String),
    Many(Vec<String>),
}

impl CategoryField {
    /// Normalize into an ordered list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(category) => vec![category],
            Self::Many(categories) => categories,
        }
    }
}

impl From<&str> for CategoryField {
    fn from(category: &str) -> Self {
        Self::One(category.to_string())
    }
}

impl From<Vec<String>> for CategoryField {
    fn from(categories: Vec<String>) -> Self {
        Self::Many(categories)
    }
}

// ============================================================================
// ItemData
// ============================================================================

/// An entry as supplied by the caller, before insertion.
///
/// `title`, `description` and `link` default to empty so a missing field
/// surfaces as a `required` validation error rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemData {
    pub title: String,
    pub description: String,
    pub link: String,
    pub author: Option<String>,
    pub pubdate: Option<DateInput>,
    pub guid: Option<String>,
    pub category: Option<CategoryField>,
    pub enclosure: Option<Enclosure>,
    pub images: Vec<Image>,
    pub videos: Vec<Video>,
    pub translations: Vec<Translation>,
    pub news: Option<News>,
    pub priority: Option<f64>,
    pub change_frequency: Option<ChangeFrequency>,
}

impl ItemData {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: link.into(),
            ..Self::default()
        }
    }

    /// Rewrite every relative URL field against `base_url`.
    fn resolve_urls(&mut self, base_url: Option<&str>) {
        let Some(base) = base_url else { return };

        self.link = resolve_url(base, &self.link);
        for image in &mut self.images {
            image.url = resolve_url(base, &image.url);
        }
        for video in &mut self.videos {
            video.thumbnail_url = resolve_url(base, &video.thumbnail_url);
            video.content_url = resolve_url(base, &video.content_url);
        }
        for translation in &mut self.translations {
            translation.url = resolve_url(base, &translation.url);
        }
    }
}

impl Validatable for ItemData {
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn link(&self) -> &str {
        &self.link
    }
    fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }
    fn priority(&self) -> Option<f64> {
        self.priority
    }
    fn images(&self) -> &[Image] {
        &self.images
    }
    fn videos(&self) -> &[Video] {
        &self.videos
    }
    fn translations(&self) -> &[Translation] {
        &self.translations
    }
}

// ============================================================================
// FeedItem
// ============================================================================

/// A stored entry. Immutable once inserted into a `FeedDocument`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    title: String,
    description: String,
    link: String,
    author: Option<String>,
    pubdate: DateTimeUtc,
    guid: Option<String>,
    categories: Vec<String>,
    enclosure: Option<Enclosure>,
    images: Vec<Image>,
    videos: Vec<Video>,
    translations: Vec<Translation>,
    news: Option<News>,
    priority: Option<f64>,
    change_frequency: Option<ChangeFrequency>,
}

impl FeedItem {
    /// Resolve URLs, normalize the date and categories.
    ///
    /// A missing `pubdate` becomes `inserted_at`.
    pub(crate) fn from_data(
        mut data: ItemData,
        base_url: Option<&str>,
        inserted_at: DateTimeUtc,
    ) -> Result<Self, DateError> {
        data.resolve_urls(base_url);

        let pubdate = match &data.pubdate {
            Some(input) => input.normalize()?,
            None => inserted_at,
        };

        Ok(Self {
            title: data.title,
            description: data.description,
            link: data.link,
            author: data.author,
            pubdate,
            guid: data.guid,
            categories: data.category.map(CategoryField::into_vec).unwrap_or_default(),
            enclosure: data.enclosure,
            images: data.images,
            videos: data.videos,
            translations: data.translations,
            news: data.news,
            priority: data.priority,
            change_frequency: data.change_frequency,
        })
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

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn pubdate(&self) -> DateTimeUtc {
        self.pubdate
    }

    /// Explicit guid, or the link.
    pub fn guid(&self) -> &str {
        self.guid.as_deref().unwrap_or(&self.link)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn enclosure(&self) -> Option<&Enclosure> {
        self.enclosure.as_ref()
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }

    pub fn news(&self) -> Option<&News> {
        self.news.as_ref()
    }

    pub fn priority(&self) -> Option<f64> {
        self.priority
    }

    pub fn change_frequency(&self) -> Option<ChangeFrequency> {
        self.change_frequency
    }

    pub fn has_media(&self) -> bool {
        !self.images.is_empty() || !self.videos.is_empty()
    }
}

impl Validatable for FeedItem {
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn link(&self) -> &str {
        &self.link
    }
    fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }
    fn priority(&self) -> Option<f64> {
        self.priority
    }
    fn images(&self) -> &[Image] {
        &self.images
    }
    fn videos(&self) -> &[Video] {
        &self.videos
    }
    fn translations(&self) -> &[Translation] {
        &self.translations
    }
}
