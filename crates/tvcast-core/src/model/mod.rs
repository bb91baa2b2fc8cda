// ── Content domain model ──
//
// Canonical, immutable representations of what the feed publishes. All
// of it is read-only once a `FeedSnapshot` is built; derived views
// (series groups, live-now lists) share items through `Arc`.

pub mod content;
pub mod feed;
pub mod live;
pub mod media;
pub mod series;

// ── Re-exports ──────────────────────────────────────────────────────

pub use content::{ContentItem, ContentKind};
pub use feed::FeedSnapshot;
pub use live::LiveFeed;
pub use media::{MediaItem, PlayableContent, VideoType, VideoVariant, format_duration};
pub use series::{OTHER_SERIES, SeriesGroup};
