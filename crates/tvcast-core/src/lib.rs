// tvcast-core: Content model, classification, remote-key input, focus and
// playback sessions shared by every tvcast front end.

pub mod classify;
pub mod config;
pub mod convert;
pub mod error;
pub mod focus;
pub mod input;
pub mod model;
pub mod navigation;
pub mod playback;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::{
    HomeRows, find_content, find_series, home_rows, live_ids, live_now, recent_items,
    series_groups, series_name,
};
pub use config::{FeedConfig, SessionConfig};
pub use error::CoreError;
pub use focus::{FocusBoundaryCoordinator, FocusCursor, ListId, MoveOutcome};
pub use input::{Direction, KeyEventBus, PublishReport, RemoteKey, SubscriptionHandle};
pub use navigation::{ChannelNavigator, NavigationRequest, Navigator};
pub use playback::{
    BufferProfile, KeyCommand, ManifestRewrite, MediaTransport, PlaybackSession,
    PlaybackSessionController, PlaybackTarget, PlayerSignal, SessionHost, StartRequest,
    TransportState,
};
pub use store::{ContentState, FeedSource, FeedStore, feed_client};
pub use stream::SnapshotStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ContentItem, ContentKind, FeedSnapshot, LiveFeed, MediaItem, PlayableContent, SeriesGroup,
    VideoType, VideoVariant, format_duration,
};
