//! The playback state machine.
//!
//! `PlaybackSession` holds no timers, handles, or locks; every transition
//! is a plain method call. The controller owns the only mutable instance
//! and publishes clones of it as snapshots.

use serde::Serialize;
use tracing::debug;

use super::source::PlaybackTarget;
use super::state::{PlayerSignal, TransportState};
use crate::model::VideoType;

const GENERIC_PLAYBACK_ERROR: &str = "An error occurred during playback";

/// A command for the media transport produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TransportCommand {
    Seek(f64),
    Pause,
    Resume,
}

/// State of one player screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSession {
    media_id: String,
    source_url: String,
    resolved_video_type: VideoType,
    is_live_stream: bool,
    transport_state: TransportState,
    position_seconds: f64,
    duration_seconds: Option<f64>,
    controls_visible: bool,
    last_error: Option<String>,
    /// State to return to once a stall clears.
    #[serde(skip)]
    resume_to: Option<TransportState>,
}

impl PlaybackSession {
    pub(crate) fn new(target: &PlaybackTarget) -> Self {
        Self {
            media_id: target.media_id.clone(),
            source_url: target.source.url.clone(),
            resolved_video_type: target.source.video_type,
            is_live_stream: target.is_live_stream,
            transport_state: TransportState::Initializing,
            position_seconds: 0.0,
            duration_seconds: None,
            controls_visible: false,
            last_error: None,
            resume_to: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn media_id(&self) -> &str {
        &self.media_id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn resolved_video_type(&self) -> VideoType {
        self.resolved_video_type
    }

    pub fn is_live_stream(&self) -> bool {
        self.is_live_stream
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport_state
    }

    pub fn position_seconds(&self) -> f64 {
        self.position_seconds
    }

    /// `None` until the player reports a load. Always `None` for live.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Text for a buffering overlay, when one should be shown.
    pub fn buffering_message(&self) -> Option<&'static str> {
        match self.transport_state {
            TransportState::Initializing | TransportState::Buffering if self.is_live_stream => {
                Some("Connecting to live stream...")
            }
            TransportState::Initializing | TransportState::Buffering => Some("Buffering..."),
            _ => None,
        }
    }

    fn running_state(&self) -> TransportState {
        if self.is_live_stream {
            TransportState::Live
        } else {
            TransportState::Playing
        }
    }

    // ── Player signals ───────────────────────────────────────────────

    /// Apply a player callback. Returns `true` if anything changed.
    pub(crate) fn apply_signal(&mut self, signal: PlayerSignal) -> bool {
        if self.transport_state.is_terminal() {
            debug!(media_id = %self.media_id, ?signal, "signal after error ignored");
            return false;
        }
        let before = self.clone();

        match signal {
            PlayerSignal::Error(message) => {
                self.transport_state = TransportState::Error;
                self.resume_to = None;
                self.last_error = Some(if message.trim().is_empty() {
                    GENERIC_PLAYBACK_ERROR.to_owned()
                } else {
                    message
                });
            }
            PlayerSignal::Buffer(true) => match self.transport_state {
                TransportState::Initializing => self.transport_state = TransportState::Buffering,
                state if state.is_running() => {
                    self.resume_to = Some(state);
                    self.transport_state = TransportState::Buffering;
                }
                _ => {}
            },
            PlayerSignal::Buffer(false) => {
                if self.transport_state == TransportState::Buffering {
                    if let Some(resume) = self.resume_to.take() {
                        self.transport_state = resume;
                    }
                }
            }
            PlayerSignal::Load(duration) => {
                if !self.is_live_stream && duration.is_finite() {
                    self.duration_seconds = Some(duration.max(0.0));
                }
                if matches!(
                    self.transport_state,
                    TransportState::Initializing | TransportState::Buffering
                ) {
                    let running = self.running_state();
                    self.transport_state = self.resume_to.take().unwrap_or(running);
                }
            }
            PlayerSignal::Progress(position) => {
                if position.is_finite() {
                    self.position_seconds = position.max(0.0);
                }
            }
            PlayerSignal::End => {
                if !self.is_live_stream {
                    self.transport_state = TransportState::Paused;
                    self.resume_to = None;
                    if let Some(duration) = self.duration_seconds {
                        self.position_seconds = duration;
                    }
                }
            }
        }

        let changed = *self != before;
        if changed && self.transport_state != before.transport_state {
            debug!(
                media_id = %self.media_id,
                from = %before.transport_state,
                to = %self.transport_state,
                "transport state changed"
            );
        }
        changed
    }

    // ── User requests ────────────────────────────────────────────────

    /// Seek to an absolute position, clamped to `[0, duration]`. A session
    /// whose duration is unknown clamps to `[0, 0]`. No-op when live or
    /// errored.
    pub(crate) fn seek_to(&mut self, target: f64) -> Option<TransportCommand> {
        if self.is_live_stream || self.transport_state.is_terminal() || target.is_nan() {
            return None;
        }
        let upper = self.duration_seconds.unwrap_or(0.0);
        let position = target.clamp(0.0, upper);
        self.position_seconds = position;
        Some(TransportCommand::Seek(position))
    }

    /// Seek relative to the current position.
    pub(crate) fn seek_by(&mut self, delta: f64) -> Option<TransportCommand> {
        self.seek_to(self.position_seconds + delta)
    }

    /// Flip between playing and paused. While starting up or stalled, the
    /// flip applies to the state playback resumes into.
    pub(crate) fn toggle_pause(&mut self) -> Option<TransportCommand> {
        if self.is_live_stream {
            return None;
        }
        match self.transport_state {
            TransportState::Playing => {
                self.transport_state = TransportState::Paused;
                Some(TransportCommand::Pause)
            }
            TransportState::Paused => {
                self.transport_state = TransportState::Playing;
                Some(TransportCommand::Resume)
            }
            TransportState::Initializing | TransportState::Buffering => {
                let pending = self.resume_to.unwrap_or(TransportState::Playing);
                if pending == TransportState::Paused {
                    self.resume_to = Some(TransportState::Playing);
                    Some(TransportCommand::Resume)
                } else {
                    self.resume_to = Some(TransportState::Paused);
                    Some(TransportCommand::Pause)
                }
            }
            TransportState::Live | TransportState::Error => None,
        }
    }

    pub(crate) fn set_controls_visible(&mut self, visible: bool) {
        self.controls_visible = visible;
    }
}
