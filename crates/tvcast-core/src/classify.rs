//! Pure views over a [`FeedSnapshot`]: recency lists, series groups, and
//! live-now filtering.
//!
//! Nothing here mutates the snapshot or reads a clock; "now" is always an
//! argument. Missing data yields empty output, never an error.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{ContentItem, FeedSnapshot, LiveFeed, MediaItem, OTHER_SERIES, SeriesGroup};

/// Separator between a series name and the episode part of a title.
pub const SERIES_SEPARATOR: &str = " - ";

// ── Ordering helpers ─────────────────────────────────────────────────

/// Newest first. `sort_by` is stable, so equal dates keep feed order.
fn newest_first(items: &mut [Arc<MediaItem>]) {
    items.sort_by(|a, b| b.release_date.cmp(&a.release_date));
}

/// Locale-style name ordering: case-insensitive first, then code points so
/// the order stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Series name for a title, or `None` when it has no `" - "` separator.
pub fn series_name(title: &str) -> Option<&str> {
    title
        .split_once(SERIES_SEPARATOR)
        .map(|(series, _episode)| series)
}

// ── Classifier operations ────────────────────────────────────────────

/// The `count` newest media items.
pub fn recent_items(snapshot: &FeedSnapshot, count: usize) -> Vec<Arc<MediaItem>> {
    if count == 0 {
        return Vec::new();
    }
    let mut items = snapshot.items.clone();
    newest_first(&mut items);
    items.truncate(count);
    items
}

/// Partition media items into series by title prefix, sorted by name.
pub fn series_groups(snapshot: &FeedSnapshot) -> Vec<SeriesGroup> {
    let mut by_name: IndexMap<&str, Vec<Arc<MediaItem>>> = IndexMap::new();
    for item in &snapshot.items {
        let name = series_name(&item.title).unwrap_or(OTHER_SERIES);
        by_name.entry(name).or_default().push(Arc::clone(item));
    }

    let mut groups: Vec<SeriesGroup> = by_name
        .into_iter()
        .map(|(name, mut items)| {
            newest_first(&mut items);
            SeriesGroup {
                name: name.to_owned(),
                items,
            }
        })
        .collect();
    groups.sort_by(|a, b| collate(&a.name, &b.name));
    groups
}

/// Live feeds on air at `now` (inclusive bounds), in feed order.
pub fn live_now(snapshot: &FeedSnapshot, now: DateTime<Utc>) -> Vec<Arc<LiveFeed>> {
    snapshot
        .live_feeds
        .iter()
        .filter(|feed| feed.is_live_at(now))
        .cloned()
        .collect()
}

/// Ids of the feeds on air at `now`.
pub fn live_ids(snapshot: &FeedSnapshot, now: DateTime<Utc>) -> HashSet<String> {
    snapshot
        .live_feeds
        .iter()
        .filter(|feed| feed.is_live_at(now))
        .map(|feed| feed.item.id.clone())
        .collect()
}

// ── Lookups ──────────────────────────────────────────────────────────

/// The series group with exactly this name.
pub fn find_series(snapshot: &FeedSnapshot, name: &str) -> Option<SeriesGroup> {
    series_groups(snapshot)
        .into_iter()
        .find(|group| group.name == name)
}

/// Look an id up among media items first, then live feeds.
pub fn find_content(snapshot: &FeedSnapshot, id: &str) -> Option<ContentItem> {
    snapshot
        .media_by_id(id)
        .map(|item| ContentItem::Media(Arc::clone(item)))
        .or_else(|| {
            snapshot
                .live_feed_by_id(id)
                .map(|feed| ContentItem::Live(Arc::clone(feed)))
        })
}

// ── Home screen ──────────────────────────────────────────────────────

/// The rows a home screen shows, computed in one pass over the snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeRows {
    pub recent: Vec<Arc<MediaItem>>,
    pub live: Vec<Arc<LiveFeed>>,
    pub series: Vec<SeriesGroup>,
}

pub fn home_rows(snapshot: &FeedSnapshot, now: DateTime<Utc>, recent_count: usize) -> HomeRows {
    HomeRows {
        recent: recent_items(snapshot, recent_count),
        live: live_now(snapshot, now),
        series: series_groups(snapshot),
    }
}
