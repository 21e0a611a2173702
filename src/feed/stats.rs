//! Statistics and size estimation.

use super::FeedDocument;
use crate::utils::date::DateTimeUtc;
use serde::Serialize;

/// Fixed part of the size estimate, in bytes.
pub const BASE_SIZE_ESTIMATE: u64 = 1000;

/// Per-item part of the size estimate, in bytes.
pub const ITEM_SIZE_ESTIMATE: u64 = 2000;

/// Summary of a document's contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedStats {
    pub item_count: usize,
    pub image_count: usize,
    pub video_count: usize,
    pub translation_count: usize,
    /// Mean over items that carry a priority; 0 when none do.
    pub average_priority: f64,
    pub last_modified: DateTimeUtc,
    /// Linear estimate, not a byte count of any rendering.
    pub size_estimate: u64,
}

impl FeedDocument {
    pub fn stats(&self) -> FeedStats {
        let items = self.items();

        let priorities: Vec<f64> = items.iter().filter_map(|item| item.priority()).collect();
        #[allow(clippy::cast_precision_loss)] // Item counts stay far below 2^52
        let average_priority = if priorities.is_empty() {
            0.0
        } else {
            priorities.iter().sum::<f64>() / priorities.len() as f64
        };

        FeedStats {
            item_count: items.len(),
            image_count: items.iter().map(|item| item.images().len()).sum(),
            video_count: items.iter().map(|item| item.videos().len()).sum(),
            translation_count: items.iter().map(|item| item.translations().len()).sum(),
            average_priority,
            last_modified: self.last_build_date(),
            size_estimate: estimate_size(items.len()),
        }
    }

    /// Whether the document exceeds `max_items` or `max_file_size`.
    ///
    /// Sitting exactly on a limit does not split.
    pub fn should_split(&self) -> bool {
        let config = self.config();
        self.len() > config.max_items || estimate_size(self.len()) > config.max_file_size
    }
}

fn estimate_size(item_count: usize) -> u64 {
    let count = u64::try_from(item_count).unwrap_or(u64::MAX);
    BASE_SIZE_ESTIMATE.saturating_add(ITEM_SIZE_ESTIMATE.saturating_mul(count))
}
