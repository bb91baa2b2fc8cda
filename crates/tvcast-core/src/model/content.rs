// ── Media-or-live tagged content ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::live::LiveFeed;
use crate::model::media::{MediaItem, PlayableContent};

/// Which feed list an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
    Media,
    Live,
}

/// Anything a details or player screen can be pointed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    Media(Arc<MediaItem>),
    Live(Arc<LiveFeed>),
}

impl ContentItem {
    fn item(&self) -> &MediaItem {
        match self {
            Self::Media(item) => item,
            Self::Live(feed) => &feed.item,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Media(_) => ContentKind::Media,
            Self::Live(_) => ContentKind::Live,
        }
    }

    pub fn id(&self) -> &str {
        &self.item().id
    }

    pub fn title(&self) -> &str {
        &self.item().title
    }

    pub fn short_description(&self) -> &str {
        &self.item().short_description
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.item().thumbnail_url
    }

    pub fn genres(&self) -> &IndexSet<String> {
        &self.item().genres
    }

    pub fn tags(&self) -> &IndexSet<String> {
        &self.item().tags
    }

    pub fn release_date(&self) -> DateTime<Utc> {
        self.item().release_date
    }

    pub fn content(&self) -> &PlayableContent {
        &self.item().content
    }

    /// The live feed, when this is one.
    pub fn as_live(&self) -> Option<&Arc<LiveFeed>> {
        match self {
            Self::Live(feed) => Some(feed),
            Self::Media(_) => None,
        }
    }
}

impl From<Arc<MediaItem>> for ContentItem {
    fn from(item: Arc<MediaItem>) -> Self {
        Self::Media(item)
    }
}

impl From<Arc<LiveFeed>> for ContentItem {
    fn from(feed: Arc<LiveFeed>) -> Self {
        Self::Live(feed)
    }
}
