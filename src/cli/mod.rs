//! Command-line interface module.

mod args;
pub mod render;
pub mod stats;
pub mod validate;

pub use args::{Cli, Commands};

use anyhow::{Context, Result};
use feedkit::{FeedDocument, FeedFile, debug};

/// Load the feed definition named by `--config` and build the document.
pub fn load_document(cli: &Cli) -> Result<FeedDocument> {
    let path = &cli.config;
    let file = FeedFile::load(path)?;
    debug!("config"; "loaded {} with {} items", path.display(), file.items.len());
    file.into_document()
        .with_context(|| format!("failed to build feed from `{}`", path.display()))
}
