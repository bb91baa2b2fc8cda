// ── Series groups ──

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::media::MediaItem;

/// Group name for titles without a series prefix.
pub const OTHER_SERIES: &str = "Other";

/// Items sharing a title prefix, newest first. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGroup {
    pub name: String,
    pub items: Vec<Arc<MediaItem>>,
}

impl SeriesGroup {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Artwork for the group: its newest item's thumbnail.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.items.first().map(|item| item.thumbnail_url.as_str())
    }
}
