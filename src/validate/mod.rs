//! Field-level validation for feed items.
//!
//! `validate_item` runs every rule against an item and returns all
//! violations in a fixed order:
//!
//! 1. `title`, `description` required
//! 2. `link` required, URL, allowed domain
//! 3. `author` non-empty when present
//! 4. `priority` in `[0.0, 1.0]`
//! 5. `images[i].url`
//! 6. `videos[i]` urls, title, description
//! 7. `translations[i]` language and url
//!
//! Collection never stops at the first error, so the same input always
//! yields the same list.

mod rules;

pub use rules::{
    host_of, is_domain_allowed, is_present, is_valid_email, is_valid_language, is_valid_priority,
    is_valid_url,
};

use crate::feed::{Image, Translation, Video};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error types
// ============================================================================

/// Which rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Required,
    InvalidUrl,
    DomainNotAllowed,
    InvalidRange,
    InvalidLanguage,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidUrl => "invalid_url",
            Self::DomainNotAllowed => "domain_not_allowed",
            Self::InvalidRange => "invalid_range",
            Self::InvalidLanguage => "invalid_language",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Field path, e.g. `link` or `images[2].url`
    pub field: String,
    pub kind: ErrorKind,
    pub message: String,
    /// The offending value as text (empty when missing)
    pub value: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
            value: value.into(),
        }
    }

    /// Prefix the field path, e.g. `title` -> `items[3].title`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.field = format!("{prefix}.{}", self.field);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.field, self.message, self.kind)
    }
}

/// Raised by eager validation on insert; carries every violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", self.message())]
pub struct ValidationFailure {
    pub errors: Vec<ValidationError>,
}

impl ValidationFailure {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// All messages joined with `"; "`.
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ============================================================================
// Validatable
// ============================================================================

/// Read access to the fields the item rules look at.
///
/// Implemented by both the caller-supplied `ItemData` and the stored
/// `FeedItem`, so eager and feed-level validation share one rule set.
pub trait Validatable {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn link(&self) -> &str;
    fn author(&self) -> Option<&str>;
    fn priority(&self) -> Option<f64>;
    fn images(&self) -> &[Image];
    fn videos(&self) -> &[Video];
    fn translations(&self) -> &[Translation];
}

// ============================================================================
// Item validation
// ============================================================================

/// Validate one item. Returns every violation, in rule order.
pub fn validate_item<T: Validatable + ?Sized>(
    item: &T,
    allowed_domains: &[String],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_required(&mut errors, "title", item.title());
    check_required(&mut errors, "description", item.description());
    check_url(&mut errors, "link", item.link(), allowed_domains);

    if let Some(author) = item.author() {
        check_required(&mut errors, "author", author);
    }

    if let Some(priority) = item.priority().filter(|p| !is_valid_priority(*p)) {
        errors.push(ValidationError::new(
            "priority",
            ErrorKind::InvalidRange,
            "priority must be between 0.0 and 1.0",
            priority.to_string(),
        ));
    }

    for (i, image) in item.images().iter().enumerate() {
        let field = format!("images[{i}].url");
        check_url(&mut errors, &field, &image.url, allowed_domains);
    }

    for (i, video) in item.videos().iter().enumerate() {
        let field = |name: &str| format!("videos[{i}].{name}");
        let thumbnail = &video.thumbnail_url;
        check_url(&mut errors, &field("thumbnail_url"), thumbnail, allowed_domains);
        let content = &video.content_url;
        check_url(&mut errors, &field("content_url"), content, allowed_domains);
        check_required(&mut errors, &field("title"), &video.title);
        check_required(&mut errors, &field("description"), &video.description);
    }

    for (i, translation) in item.translations().iter().enumerate() {
        let field = |name: &str| format!("translations[{i}].{name}");
        let language = field("language");
        check_required(&mut errors, &language, &translation.language);
        if !is_valid_language(&translation.language) {
            errors.push(ValidationError::new(
                &language,
                ErrorKind::InvalidLanguage,
                format!("{language} must be a language code like `en` or `en-US`"),
                &translation.language,
            ));
        }
        check_url(&mut errors, &field("url"), &translation.url, allowed_domains);
    }

    errors
}

/// Report `required` for a blank value. Returns whether the value is present.
pub(crate) fn check_required(errors: &mut Vec<ValidationError>, field: &str, value: &str) -> bool {
    if is_present(value) {
        return true;
    }
    errors.push(ValidationError::new(
        field,
        ErrorKind::Required,
        format!("{field} is required"),
        value,
    ));
    false
}

/// Required, then URL shape, then domain. Only the first failing step is reported.
fn check_url(
    errors: &mut Vec<ValidationError>,
    field: &str,
    value: &str,
    allowed_domains: &[String],
) {
    if !check_required(errors, field, value) {
        return;
    }

    if !is_valid_url(value) {
        errors.push(ValidationError::new(
            field,
            ErrorKind::InvalidUrl,
            format!("{field} must be a valid http(s) URL"),
            value,
        ));
        return;
    }

    if !is_domain_allowed(value, allowed_domains) {
        let message = match host_of(value) {
            Some(host) => format!("{field} host `{host}` is not an allowed domain"),
            None => format!("{field} host could not be determined"),
        };
        errors.push(ValidationError::new(
            field,
            ErrorKind::DomainNotAllowed,
            message,
            value,
        ));
    }
}
