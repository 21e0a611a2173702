//! Configuration error types.

use crate::error::FeedError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a feed definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("feed file parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("items[{index}]: {source}")]
    Item {
        index: usize,
        #[source]
        source: FeedError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("feed.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("feed.toml"));

        let item_err = ConfigError::Item {
            index: 3,
            source: FeedError::UnsupportedFormat("x".to_string()),
        };
        assert!(item_err.to_string().starts_with("items[3]: "));
    }
}
