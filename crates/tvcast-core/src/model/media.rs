// ── On-demand media ──

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An on-demand video as published in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub thumbnail_url: String,
    /// Feed order, duplicates removed.
    pub genres: IndexSet<String>,
    pub tags: IndexSet<String>,
    pub release_date: DateTime<Utc>,
    pub content: PlayableContent,
}

impl MediaItem {
    /// The variant the player starts with, if the item is playable at all.
    pub fn primary_variant(&self) -> Option<&VideoVariant> {
        self.content.variants.first()
    }
}

/// The playable payload of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayableContent {
    pub duration_seconds: f64,
    /// Live feeds may leave this out.
    pub language: Option<String>,
    pub date_added: Option<DateTime<Utc>>,
    pub variants: Vec<VideoVariant>,
}

impl PlayableContent {
    /// `true` when at least one variant exists.
    pub fn is_playable(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Duration rendered as `m:ss`.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_seconds)
    }
}

/// One encoding of a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoVariant {
    pub quality: String,
    pub url: String,
    /// Publisher-declared type string. The player infers its own.
    pub video_type: String,
}

/// Container/protocol the media transport is told to expect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VideoType {
    Mp4,
    Hls,
    Mpd,
}

impl VideoType {
    /// Infer the type from a URL: `.mpd` wins over `.m3u8`, anything else is mp4.
    pub fn infer(url: &str) -> Self {
        if url.contains(".mpd") {
            Self::Mpd
        } else if url.contains(".m3u8") {
            Self::Hls
        } else {
            Self::Mp4
        }
    }
}

/// Format whole seconds as `m:ss` (`125` → `2:05`). Minutes are not
/// wrapped into hours. Negative and non-finite inputs render as `0:00`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor()
    } else {
        0.0
    };
    let minutes = (total / 60.0).floor();
    let secs = total - minutes * 60.0;
    format!("{minutes:.0}:{secs:02.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_pads_seconds() {
        assert_eq!(format_duration(125.0), "2:05");
        assert_eq!(format_duration(60.0), "1:00");
        assert_eq!(format_duration(9.9), "0:09");
        assert_eq!(format_duration(3725.0), "62:05");
    }

    #[test]
    fn format_duration_clamps_garbage() {
        assert_eq!(format_duration(-3.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn video_type_inference() {
        assert_eq!(VideoType::infer("https://a.test/x/manifest/video.mpd"), VideoType::Mpd);
        assert_eq!(VideoType::infer("https://a.test/x/index.m3u8?token=1"), VideoType::Hls);
        assert_eq!(VideoType::infer("https://a.test/x/file.mp4"), VideoType::Mp4);
        assert_eq!(VideoType::infer("https://a.test/x/direct"), VideoType::Mp4);
    }

    #[test]
    fn video_type_parses_case_insensitively() {
        assert_eq!("HLS".parse::<VideoType>().ok(), Some(VideoType::Hls));
        assert_eq!(VideoType::Mpd.to_string(), "mpd");
    }
}
