//! Turning a content item into something the media transport can open.
//!
//! Video-CDN manifest URLs are swapped for the CDN's direct progressive
//! file. That rule is a workaround for players that choke on the CDN's
//! manifests and lives entirely in [`ManifestRewrite`] so it can be
//! changed or disabled without touching the session logic.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;
use crate::model::{ContentItem, VideoType};

/// Rewrite rule for CDN-hosted manifest URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRewrite {
    /// Host suffix identifying the CDN (`example.com` matches `a.example.com`).
    pub host: String,
    /// Path fragments to replace.
    pub manifest_paths: Vec<String>,
    /// Replacement pointing at the direct file.
    pub direct_path: String,
}

impl Default for ManifestRewrite {
    fn default() -> Self {
        Self {
            host: "cloudflarestream.com".into(),
            manifest_paths: vec!["/manifest/video.mpd".into(), "/manifest/video.m3u8".into()],
            direct_path: "/direct".into(),
        }
    }
}

impl ManifestRewrite {
    /// A rule that never matches.
    pub fn disabled() -> Self {
        Self {
            host: String::new(),
            manifest_paths: Vec::new(),
            direct_path: String::new(),
        }
    }

    fn matches(&self, url: &str) -> bool {
        if self.host.is_empty() {
            return false;
        }
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| {
                host == self.host || host.ends_with(&format!(".{}", self.host))
            })
    }

    /// The direct-file URL when `url` is on the CDN.
    pub fn apply(&self, url: &str) -> Option<String> {
        if !self.matches(url) {
            return None;
        }
        let rewritten = self
            .manifest_paths
            .iter()
            .fold(url.to_owned(), |acc, path| acc.replace(path.as_str(), &self.direct_path));
        Some(rewritten)
    }
}

/// URL and container type handed to the media transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSource {
    pub url: String,
    pub video_type: VideoType,
}

/// Resolve the URL the player should open and the type it should expect.
///
/// CDN URLs become direct mp4 files; everything else keeps its URL and
/// gets its type from [`VideoType::infer`].
pub fn resolve_playable_url(url: &str, rewrite: &ManifestRewrite) -> ResolvedSource {
    match rewrite.apply(url) {
        Some(direct) => ResolvedSource {
            url: direct,
            video_type: VideoType::Mp4,
        },
        None => ResolvedSource {
            url: url.to_owned(),
            video_type: VideoType::infer(url),
        },
    }
}

/// Everything needed to open a playback session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackTarget {
    pub media_id: String,
    pub title: String,
    pub source: ResolvedSource,
    pub is_live_stream: bool,
}

impl PlaybackTarget {
    /// Build a target from a content item's first variant. The item is a
    /// live stream iff its id is in `live_ids` (the live-now set at open
    /// time).
    pub fn for_content(
        item: &ContentItem,
        live_ids: &HashSet<String>,
        rewrite: &ManifestRewrite,
    ) -> Result<Self, CoreError> {
        let variant =
            item.content()
                .variants
                .first()
                .ok_or_else(|| CoreError::InvariantViolation {
                    message: format!("item {} has no video variants", item.id()),
                })?;
        Ok(Self {
            media_id: item.id().to_owned(),
            title: item.title().to_owned(),
            source: resolve_playable_url(&variant.url, rewrite),
            is_live_stream: live_ids.contains(item.id()),
        })
    }
}
