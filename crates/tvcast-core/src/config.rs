// ── Runtime configuration ──
//
// These types describe how the core behaves at runtime. They never touch
// disk: tvcast-config (or any embedding app) builds them and hands them in.

use std::time::Duration;

use url::Url;

use crate::playback::{BufferProfile, ManifestRewrite};

/// Default delay before on-screen controls hide themselves.
pub const DEFAULT_CONTROLS_HIDE_DELAY: Duration = Duration::from_millis(3000);

/// Default seek step for the directional keys.
pub const DEFAULT_SEEK_STEP_SECS: f64 = 10.0;

/// Default number of items in the "recent" row.
pub const DEFAULT_RECENT_COUNT: usize = 10;

/// Per-session playback behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// How long controls stay visible after the last qualifying input.
    pub controls_hide_delay: Duration,
    /// Seconds moved by a single seek key press.
    pub seek_step_secs: f64,
    /// Platform-native controls are drawn; remote keys are ignored.
    pub native_controls: bool,
    /// Rewrite rule for CDN manifest URLs.
    pub rewrite: ManifestRewrite,
    /// Buffering hints passed to the transport on start.
    pub buffer: BufferProfile,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            controls_hide_delay: DEFAULT_CONTROLS_HIDE_DELAY,
            seek_step_secs: DEFAULT_SEEK_STEP_SECS,
            native_controls: false,
            rewrite: ManifestRewrite::default(),
            buffer: BufferProfile::default(),
        }
    }
}

/// Where and how to fetch the content feed.
///
/// Built by the CLI, passed to [`feed_client`](crate::store::feed_client).
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed document URL.
    pub url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}
