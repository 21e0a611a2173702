//! feedkit - build RSS 2.0, Atom 1.0 and XML sitemap documents.
//!
//! Collect items into a [`FeedDocument`], optionally validating them on the
//! way in, then render the document in any [`FeedFormat`]:
//!
//! ```no_run
//! use feedkit::{FeedConfig, FeedDocument, FeedFormat, ItemData};
//!
//! let mut doc = FeedDocument::new(FeedConfig::default());
//! doc.set_title("Blog")
//!     .set_description("Posts")
//!     .set_link("https://example.com");
//! doc.add_item(ItemData::new("Hello", "First post", "https://example.com/hello"))?;
//! let xml = doc.render(FeedFormat::Rss)?;
//! # Ok::<(), feedkit::FeedError>(())
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod generator;
pub mod logger;
pub mod utils;
pub mod validate;

pub use config::{ConfigError, FeedConfig, FeedFile};
pub use error::FeedError;
pub use feed::{
    CategoryField, ChangeFrequency, Enclosure, FeedDocument, FeedFormat, FeedItem, FeedStats,
    Image, ItemData, News, Translation, Video,
};
pub use utils::date::{DateError, DateFormat, DateInput, DateTimeUtc};
pub use validate::{ErrorKind, Validatable, ValidationError, ValidationFailure, validate_item};
