//! Error types raised by the feed aggregate and renderers.

use crate::{utils::date::DateError, validate::ValidationFailure};
use thiserror::Error;

/// Feed-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Eager validation rejected an item; nothing was inserted.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("unsupported feed format `{0}` (expected rss, atom or sitemap)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Date(#[from] DateError),

    /// A generated element or attribute name is not a valid XML name.
    #[error("invalid XML name `{0}`")]
    InvalidTagName(String),
}
