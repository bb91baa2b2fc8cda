// ── API-to-domain type conversions ──
//
// Bridges raw `tvcast_api` wire types into `tvcast_core::model` values.
// Bad data never fails the whole snapshot: unparseable release dates fall
// back to the epoch (sorting last), video variants without a URL are
// skipped, and live feeds without a usable validity window are dropped
// with a warning.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use tvcast_api::types::{
    ContentResponse, FeedResponse, LiveFeedResponse, MovieResponse, VideoResponse,
};

use crate::model::{FeedSnapshot, LiveFeed, MediaItem, PlayableContent, VideoVariant};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a feed timestamp: RFC 3339, a naive date-time, or a plain date
/// (taken as UTC midnight).
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_optional(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_timestamp)
}

fn release_date(id: &str, raw: Option<&str>) -> DateTime<Utc> {
    parse_optional(raw).unwrap_or_else(|| {
        warn!(item = %id, raw = ?raw, "unparseable release date, sorting item last");
        DateTime::<Utc>::UNIX_EPOCH
    })
}

// ── Content ────────────────────────────────────────────────────────

impl From<VideoResponse> for VideoVariant {
    fn from(v: VideoResponse) -> Self {
        Self {
            quality: v.quality,
            url: v.url,
            video_type: v.video_type,
        }
    }
}

impl From<ContentResponse> for PlayableContent {
    fn from(c: ContentResponse) -> Self {
        let duration_seconds = if c.duration.is_finite() && c.duration > 0.0 {
            c.duration
        } else {
            0.0
        };
        Self {
            duration_seconds,
            language: c.language.filter(|lang| !lang.is_empty()),
            date_added: parse_optional(c.date_added.as_deref()),
            variants: c
                .videos
                .into_iter()
                .filter(|v| !v.url.trim().is_empty())
                .map(VideoVariant::from)
                .collect(),
        }
    }
}

// ── Items ──────────────────────────────────────────────────────────

impl From<MovieResponse> for MediaItem {
    fn from(m: MovieResponse) -> Self {
        let release_date = release_date(&m.id, m.release_date.as_deref());
        Self {
            id: m.id,
            title: m.title,
            short_description: m.short_description,
            thumbnail_url: m.thumbnail,
            genres: m.genres.into_iter().collect(),
            tags: m.tags.into_iter().collect(),
            release_date,
            content: m.content.into(),
        }
    }
}

/// Convert a wire live feed, dropping it when its window is unusable.
fn convert_live_feed(f: LiveFeedResponse) -> Option<LiveFeed> {
    let (Some(start), Some(end)) = (
        parse_optional(f.validity_period_start.as_deref()),
        parse_optional(f.validity_period_end.as_deref()),
    ) else {
        warn!(
            feed = %f.id,
            start = ?f.validity_period_start,
            end = ?f.validity_period_end,
            "dropping live feed with missing or unparseable validity window"
        );
        return None;
    };

    let item = MediaItem::from(MovieResponse {
        id: f.id,
        title: f.title,
        short_description: f.short_description,
        thumbnail: f.thumbnail,
        genres: f.genres,
        tags: f.tags,
        release_date: f.release_date,
        content: f.content,
    });

    match LiveFeed::new(item, start, end) {
        Ok(feed) => Some(feed),
        Err(e) => {
            warn!(error = %e, "dropping live feed");
            None
        }
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

impl From<FeedResponse> for FeedSnapshot {
    fn from(resp: FeedResponse) -> Self {
        Self {
            provider_name: resp.provider_name,
            language: resp.language,
            last_updated: parse_optional(resp.last_updated.as_deref()),
            items: resp
                .movies
                .into_iter()
                .map(|m| Arc::new(MediaItem::from(m)))
                .collect(),
            live_feeds: resp
                .live_feeds
                .into_iter()
                .filter_map(convert_live_feed)
                .map(Arc::new)
                .collect(),
        }
    }
}
