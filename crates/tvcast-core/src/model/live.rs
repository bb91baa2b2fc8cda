// ── Scheduled live streams ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::media::MediaItem;

/// A live stream with a validity window.
///
/// Shares every field with [`MediaItem`]; `validity_start <= validity_end`
/// always holds for values built through [`LiveFeed::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveFeed {
    #[serde(flatten)]
    pub item: MediaItem,
    pub validity_start: DateTime<Utc>,
    pub validity_end: DateTime<Utc>,
}

impl LiveFeed {
    pub fn new(
        item: MediaItem,
        validity_start: DateTime<Utc>,
        validity_end: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if validity_start > validity_end {
            return Err(CoreError::InvariantViolation {
                message: format!(
                    "live feed {} ends ({validity_end}) before it starts ({validity_start})",
                    item.id
                ),
            });
        }
        Ok(Self {
            item,
            validity_start,
            validity_end,
        })
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    /// Whether the feed is on air at `now`. Both bounds are inclusive.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.validity_start <= now && now <= self.validity_end
    }
}
