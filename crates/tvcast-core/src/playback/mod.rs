// ── Playback sessions ──
//
// One session per player screen: a pure state machine (`session`), the
// source resolution that feeds it (`source`), the auto-hide countdown for
// on-screen controls (`controls`), and the controller that ties those to
// the media transport, the key bus and the navigator (`controller`).

mod controller;
mod controls;
mod host;
mod session;
mod source;
mod state;
mod transport;

pub use controller::{KeyCommand, PlaybackSessionController};
pub use host::SessionHost;
pub use session::PlaybackSession;
pub use source::{ManifestRewrite, PlaybackTarget, ResolvedSource, resolve_playable_url};
pub use state::{PlayerSignal, TransportState};
pub use transport::{BufferProfile, MediaTransport, StartRequest};
