// ── Feed store ──
//
// Holds the one feed snapshot a session works from. Fetching happens once
// per `load` with no retry; a failure leaves the store `Unavailable` and
// screens render empty content instead of an error.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use tvcast_api::{FeedClient, TransportConfig};

use crate::config::FeedConfig;
use crate::error::CoreError;
use crate::model::FeedSnapshot;
use crate::stream::SnapshotStream;

// ── FeedSource ───────────────────────────────────────────────────────

/// Anything that can produce a feed snapshot.
pub trait FeedSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<FeedSnapshot, CoreError>> + Send;
}

impl FeedSource for FeedClient {
    async fn fetch(&self) -> Result<FeedSnapshot, CoreError> {
        let response = self.fetch_feed().await?;
        Ok(FeedSnapshot::from(response))
    }
}

/// Build the HTTP feed client described by `config`.
pub fn feed_client(config: &FeedConfig) -> Result<FeedClient, CoreError> {
    let transport = TransportConfig {
        timeout: config.timeout,
        user_agent: config.user_agent.clone(),
    };
    Ok(FeedClient::new(config.url.clone(), &transport)?)
}

// ── ContentState ─────────────────────────────────────────────────────

/// What the screens have to show.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentState {
    Loading,
    Ready {
        snapshot: Arc<FeedSnapshot>,
        fetched_at: DateTime<Utc>,
    },
    Unavailable {
        message: String,
    },
}

impl ContentState {
    pub fn snapshot(&self) -> Option<&Arc<FeedSnapshot>> {
        match self {
            Self::Ready { snapshot, .. } => Some(snapshot),
            Self::Loading | Self::Unavailable { .. } => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

// ── FeedStore ────────────────────────────────────────────────────────

/// Reactive holder of the current [`ContentState`].
pub struct FeedStore {
    state: watch::Sender<ContentState>,
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ContentState::Loading);
        Self { state }
    }

    /// Fetch once from `source` and publish the outcome. `now` stamps the
    /// snapshot.
    pub async fn load<S: FeedSource>(&self, source: &S, now: DateTime<Utc>) -> ContentState {
        self.state.send_replace(ContentState::Loading);

        let next = match source.fetch().await {
            Ok(snapshot) => {
                info!(
                    provider = %snapshot.provider_name,
                    items = snapshot.items.len(),
                    live_feeds = snapshot.live_feeds.len(),
                    "feed loaded"
                );
                ContentState::Ready {
                    snapshot: Arc::new(snapshot),
                    fetched_at: now,
                }
            }
            Err(e) => {
                warn!(error = %e, "feed unavailable, showing empty content");
                ContentState::Unavailable {
                    message: e.to_string(),
                }
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    /// Publish an already-built snapshot.
    pub fn replace(&self, snapshot: FeedSnapshot, now: DateTime<Utc>) {
        self.state.send_replace(ContentState::Ready {
            snapshot: Arc::new(snapshot),
            fetched_at: now,
        });
    }

    pub fn current(&self) -> ContentState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<FeedSnapshot>> {
        self.state.borrow().snapshot().cloned()
    }

    /// The loaded snapshot, or an empty one while loading or unavailable.
    pub fn snapshot_or_empty(&self) -> Arc<FeedSnapshot> {
        self.snapshot()
            .unwrap_or_else(|| Arc::new(FeedSnapshot::empty()))
    }

    pub fn subscribe(&self) -> SnapshotStream<ContentState> {
        SnapshotStream::new(self.state.subscribe())
    }
}
