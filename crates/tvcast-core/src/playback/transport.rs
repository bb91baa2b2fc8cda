// ── Media transport seam ──
//
// Decoding and rendering happen elsewhere. The controller issues these
// commands fire-and-forget and learns the outcome through `PlayerSignal`s.

use std::time::Duration;

use serde::Serialize;

use super::source::ResolvedSource;

/// Buffering hints forwarded to players that accept them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BufferProfile {
    pub min_buffer: Duration,
    pub max_buffer: Duration,
    pub buffer_for_playback: Duration,
    pub buffer_for_playback_after_rebuffer: Duration,
    /// How often the player should report progress.
    pub progress_interval: Duration,
}

impl Default for BufferProfile {
    fn default() -> Self {
        Self {
            min_buffer: Duration::from_millis(15_000),
            max_buffer: Duration::from_millis(50_000),
            buffer_for_playback: Duration::from_millis(2_500),
            buffer_for_playback_after_rebuffer: Duration::from_millis(5_000),
            progress_interval: Duration::from_millis(500),
        }
    }
}

/// Start-of-playback instructions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartRequest {
    pub media_id: String,
    pub source: ResolvedSource,
    pub is_live_stream: bool,
    pub buffer: BufferProfile,
}

/// The external media-playback component.
///
/// Implementations must not block. They may call back into the controller
/// from inside any of these methods.
pub trait MediaTransport: Send + Sync {
    fn start(&self, request: &StartRequest);
    fn seek(&self, position_seconds: f64);
    fn pause(&self);
    fn resume(&self);
    /// Release the player. Called once, on session teardown.
    fn stop(&self) {}
}
