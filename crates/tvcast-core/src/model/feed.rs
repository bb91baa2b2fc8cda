// ── Feed snapshot ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::live::LiveFeed;
use crate::model::media::MediaItem;

/// One fetched copy of the feed. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub provider_name: String,
    pub language: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub items: Vec<Arc<MediaItem>>,
    pub live_feeds: Vec<Arc<LiveFeed>>,
}

impl FeedSnapshot {
    /// A snapshot with no content, used when the feed could not be fetched.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.live_feeds.is_empty()
    }

    pub fn media_by_id(&self, id: &str) -> Option<&Arc<MediaItem>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn live_feed_by_id(&self, id: &str) -> Option<&Arc<LiveFeed>> {
        self.live_feeds.iter().find(|feed| feed.item.id == id)
    }
}
