use serde::{Deserialize, Serialize};
use strum::Display;

/// Where a playback session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransportState {
    /// Created, nothing heard from the player yet.
    Initializing,
    /// Waiting for data, either before first load or after a stall.
    Buffering,
    /// On-demand content advancing.
    Playing,
    /// On-demand content held by the user or at its end.
    Paused,
    /// A live stream is running. Live sessions never pause or seek.
    Live,
    /// The player reported a failure. Terminal for this session.
    Error,
}

impl TransportState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Error)
    }

    /// States that resume after a stall clears.
    pub(crate) fn is_running(self) -> bool {
        matches!(self, Self::Playing | Self::Paused | Self::Live)
    }
}

/// A callback from the media transport, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerSignal {
    /// Buffering started (`true`) or cleared (`false`).
    Buffer(bool),
    /// Playhead position in seconds.
    Progress(f64),
    /// Media loaded; carries the duration in seconds.
    Load(f64),
    /// On-demand media reached its end.
    End,
    /// The player failed. An empty message gets a generic one.
    Error(String),
}
