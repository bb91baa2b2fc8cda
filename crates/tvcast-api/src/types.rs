//! Wire types for the content feed document.
//!
//! The feed is a single JSON object with camelCase field names. Arrays the
//! publisher leaves out decode as empty, and per-item fields that are
//! missing or `null` decode as empty too, so one broken entry cannot fail
//! the whole document. Timestamps stay as raw strings and are parsed by
//! `tvcast-core`, which decides how to treat malformed ones.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Feed document ────────────────────────────────────────────────────

/// The whole feed — from `GET {feed_url}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub movies: Vec<MovieResponse>,
    #[serde(default)]
    pub live_feeds: Vec<LiveFeedResponse>,
}

// ── Items ────────────────────────────────────────────────────────────

/// An on-demand video entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub content: ContentResponse,
}

/// A scheduled live stream. Same shape as a movie plus its validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedResponse {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub content: ContentResponse,
    #[serde(default)]
    pub validity_period_start: Option<String>,
    #[serde(default)]
    pub validity_period_end: Option<String>,
}

/// Playable payload shared by movies and live feeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    #[serde(default)]
    pub date_added: Option<String>,
    /// Length in seconds. Live feeds usually report 0.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: f64,
    /// Optional on live feeds.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub videos: Vec<VideoResponse>,
}

/// One encoding of the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    #[serde(default)]
    pub quality: String,
    /// Empty when the publisher left it out; such variants are unplayable.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Publisher-declared type (`"MP4"`, `"HLS"`, `"DASH"`, ...). Advisory only.
    #[serde(default)]
    pub video_type: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_arrays_decode_as_empty() {
        let feed: FeedResponse =
            serde_json::from_str(r#"{"providerName":"Chapel","language":"en"}"#).unwrap();
        assert_eq!(feed.provider_name, "Chapel");
        assert!(feed.movies.is_empty());
        assert!(feed.live_feeds.is_empty());
        assert!(feed.last_updated.is_none());
    }

    #[test]
    fn live_feed_content_language_is_optional() {
        let raw = r#"{
            "id": "live-1",
            "title": "Sunday Service",
            "validityPeriodStart": "2024-01-07T10:00:00Z",
            "validityPeriodEnd": "2024-01-07T12:00:00Z",
            "content": {
                "dateAdded": "2024-01-01",
                "duration": 0,
                "videos": [{ "quality": "HD", "url": "https://cdn.test/live.m3u8", "videoType": "HLS" }]
            }
        }"#;
        let feed: LiveFeedResponse = serde_json::from_str(raw).unwrap();
        assert!(feed.content.language.is_none());
        assert_eq!(feed.content.videos.len(), 1);
        assert_eq!(feed.content.videos[0].video_type, "HLS");
    }

    #[test]
    fn broken_entries_do_not_fail_the_document() {
        let raw = r#"{
            "providerName": "Chapel",
            "movies": [
                { "id": "m1", "title": "Good", "content": { "duration": 600, "videos": [{ "url": "https://cdn.test/m1.mp4" }] } },
                { "id": "m2", "title": "No length", "content": { "duration": null, "videos": [{ "quality": "HD" }] } }
            ],
            "liveFeeds": [
                { "id": "live-1", "title": "Half a window", "validityPeriodStart": "2024-01-07T10:00:00Z" }
            ]
        }"#;
        let feed: FeedResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(feed.movies.len(), 2);
        assert!(feed.movies[1].content.duration.abs() < f64::EPSILON);
        assert!(feed.movies[1].content.videos[0].url.is_empty());
        assert_eq!(feed.live_feeds.len(), 1);
        assert!(feed.live_feeds[0].validity_period_end.is_none());
    }

    #[test]
    fn fractional_duration_is_accepted() {
        let content: ContentResponse =
            serde_json::from_str(r#"{"duration": 1834.5, "language": "en", "videos": []}"#)
                .unwrap();
        assert!((content.duration - 1834.5).abs() < f64::EPSILON);
        assert_eq!(content.language.as_deref(), Some("en"));
    }
}
