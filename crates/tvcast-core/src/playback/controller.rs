//! Owner of the single active playback session.
//!
//! The session sits behind a `parking_lot::Mutex`; key events, player
//! signals and the controls countdown may arrive on any runtime thread and
//! are applied one at a time. Transport commands and navigation requests
//! are issued after the lock is released, so collaborators are free to
//! call straight back into the controller.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::controls::ControlsTimer;
use super::session::{PlaybackSession, TransportCommand};
use super::source::PlaybackTarget;
use super::state::{PlayerSignal, TransportState};
use super::transport::{MediaTransport, StartRequest};
use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::input::{KeyEventBus, RemoteKey, SubscriptionHandle};
use crate::navigation::Navigator;
use crate::stream::SnapshotStream;

// ── KeyCommand ───────────────────────────────────────────────────────

/// What a remote key means to a player screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum KeyCommand {
    /// Seek by this many seconds (negative rewinds).
    Seek { delta_secs: f64 },
    TogglePause,
    Back,
    ShowControls,
}

impl KeyCommand {
    /// Interpret `key` with the given seek step.
    pub fn for_key(key: RemoteKey, seek_step_secs: f64) -> Self {
        match key {
            RemoteKey::Right | RemoteKey::FastForward => Self::Seek {
                delta_secs: seek_step_secs,
            },
            RemoteKey::Left | RemoteKey::Rewind => Self::Seek {
                delta_secs: -seek_step_secs,
            },
            RemoteKey::Back => Self::Back,
            RemoteKey::PlayPause => Self::TogglePause,
            RemoteKey::Up | RemoteKey::Down | RemoteKey::Enter => Self::ShowControls,
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Drives one [`PlaybackSession`] for its whole life.
///
/// Not `Clone`: the controller is the session. Dropping it (or calling
/// [`close`](Self::close)) is the one teardown path. It unsubscribes from
/// the key bus, cancels the controls countdown, and stops the transport.
pub struct PlaybackSessionController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    state: Mutex<SessionState>,
    snapshot: watch::Sender<PlaybackSession>,
    config: SessionConfig,
    transport: Arc<dyn MediaTransport>,
    navigator: Arc<dyn Navigator>,
    runtime: Handle,
    cancel: CancellationToken,
    key_subscription: Mutex<Option<(KeyEventBus, SubscriptionHandle)>>,
    last_key: Mutex<Option<KeyCommand>>,
}

struct SessionState {
    session: PlaybackSession,
    timer: ControlsTimer,
    closed: bool,
}

impl std::fmt::Debug for PlaybackSessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSessionController")
            .field("session", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl PlaybackSessionController {
    /// Open a session for `target` and tell the transport to start.
    ///
    /// Must be called from within a Tokio runtime, which hosts the
    /// controls countdown.
    pub fn open(
        target: &PlaybackTarget,
        config: SessionConfig,
        transport: Arc<dyn MediaTransport>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, CoreError> {
        let runtime = Handle::try_current().map_err(|e| CoreError::Runtime {
            message: format!("playback sessions need a Tokio runtime: {e}"),
        })?;
        let cancel = CancellationToken::new();
        let session = PlaybackSession::new(target);
        let (snapshot, _) = watch::channel(session.clone());

        let inner = Arc::new(ControllerInner {
            state: Mutex::new(SessionState {
                session,
                timer: ControlsTimer::new(config.controls_hide_delay, cancel.clone()),
                closed: false,
            }),
            snapshot,
            config,
            transport,
            navigator,
            runtime,
            cancel,
            key_subscription: Mutex::new(None),
            last_key: Mutex::new(None),
        });

        info!(
            media_id = %target.media_id,
            url = %target.source.url,
            video_type = %target.source.video_type,
            live = target.is_live_stream,
            "playback session opened"
        );

        inner.transport.start(&StartRequest {
            media_id: target.media_id.clone(),
            source: target.source.clone(),
            is_live_stream: target.is_live_stream,
            buffer: inner.config.buffer,
        });

        if !inner.config.native_controls {
            inner.show_controls();
        }

        Ok(Self { inner })
    }

    /// Route keys published on `bus` to this session until teardown.
    /// Replaces any earlier subscription.
    pub fn listen(&self, bus: &KeyEventBus) {
        let weak: Weak<ControllerInner> = Arc::downgrade(&self.inner);
        let handle = bus.subscribe(move |key| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_key(key);
            }
        });
        let previous = self
            .inner
            .key_subscription
            .lock()
            .replace((bus.clone(), handle));
        if let Some((old_bus, old_handle)) = previous {
            old_bus.unsubscribe(old_handle);
        }
    }

    // ── Observation ─────────────────────────────────────────────────

    /// Current state of the session.
    pub fn snapshot(&self) -> PlaybackSession {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to session snapshots.
    pub fn subscribe(&self) -> SnapshotStream<PlaybackSession> {
        SnapshotStream::new(self.inner.snapshot.subscribe())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    // ── Requests ────────────────────────────────────────────────────

    /// Interpret a remote key. Returns the command that took effect;
    /// `None` when keys are suppressed (native controls in use, or the
    /// session is closed) or the command was a no-op for this session.
    pub fn handle_key(&self, key: RemoteKey) -> Option<KeyCommand> {
        self.inner.handle_key(key)
    }

    /// Outcome of the most recent key, however it arrived. Cleared by
    /// reading it.
    pub fn take_last_key_command(&self) -> Option<KeyCommand> {
        self.inner.last_key.lock().take()
    }

    /// Apply a callback from the media transport.
    pub fn handle_signal(&self, signal: PlayerSignal) {
        self.inner.handle_signal(signal);
    }

    pub fn seek_by(&self, delta_secs: f64) {
        self.inner.seek(|session| session.seek_by(delta_secs));
    }

    pub fn seek_to(&self, position_secs: f64) {
        self.inner.seek(|session| session.seek_to(position_secs));
    }

    pub fn toggle_pause(&self) {
        self.inner.toggle_pause();
    }

    /// Show the controls and restart the auto-hide countdown.
    pub fn show_controls(&self) {
        self.inner.show_controls();
    }

    /// Tear the session down. Idempotent.
    pub fn close(&self) {
        self.inner.close();
    }
}

impl Drop for PlaybackSessionController {
    fn drop(&mut self) {
        self.inner.close();
    }
}

// ── Inner logic ──────────────────────────────────────────────────────

impl ControllerInner {
    fn publish(&self, state: &SessionState) {
        self.snapshot.send_replace(state.session.clone());
    }

    fn dispatch(&self, command: TransportCommand) {
        match command {
            TransportCommand::Seek(position) => self.transport.seek(position),
            TransportCommand::Pause => self.transport.pause(),
            TransportCommand::Resume => self.transport.resume(),
        }
    }

    /// Make the controls visible and restart the countdown. Caller holds
    /// the lock.
    fn arm_controls(self: &Arc<Self>, state: &mut SessionState) {
        state.session.set_controls_visible(true);
        let countdown = state.timer.rearm();
        let weak = Arc::downgrade(self);
        self.runtime.spawn(async move {
            if let Some(generation) = countdown.finish().await {
                if let Some(inner) = weak.upgrade() {
                    inner.controls_expired(generation);
                }
            }
        });
    }

    fn controls_expired(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.closed || !state.timer.expire(generation) {
            return;
        }
        state.session.set_controls_visible(false);
        debug!(media_id = %state.session.media_id(), "controls hidden");
        self.publish(&state);
    }

    fn show_controls(self: &Arc<Self>) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        self.arm_controls(&mut state);
        self.publish(&state);
    }

    /// Returns whether the seek took effect.
    fn seek(self: &Arc<Self>, apply: impl FnOnce(&mut PlaybackSession) -> Option<TransportCommand>) -> bool {
        let command = {
            let mut state = self.state.lock();
            if state.closed {
                return false;
            }
            let command = apply(&mut state.session);
            match command {
                Some(TransportCommand::Seek(position)) => {
                    debug!(media_id = %state.session.media_id(), position, "seek");
                    self.arm_controls(&mut state);
                    self.publish(&state);
                }
                _ => debug!(
                    media_id = %state.session.media_id(),
                    state = %state.session.transport_state(),
                    "seek ignored"
                ),
            }
            command
        };
        match command {
            Some(command) => {
                self.dispatch(command);
                true
            }
            None => false,
        }
    }

    fn toggle_pause(self: &Arc<Self>) -> bool {
        let command = {
            let mut state = self.state.lock();
            if state.closed {
                return false;
            }
            let command = state.session.toggle_pause();
            if command.is_some() {
                self.arm_controls(&mut state);
                self.publish(&state);
            }
            command
        };
        match command {
            Some(command) => {
                self.dispatch(command);
                true
            }
            None => false,
        }
    }

    fn handle_key(self: &Arc<Self>, key: RemoteKey) -> Option<KeyCommand> {
        let outcome = self.interpret_key(key);
        *self.last_key.lock() = outcome;
        outcome
    }

    fn interpret_key(self: &Arc<Self>, key: RemoteKey) -> Option<KeyCommand> {
        if self.config.native_controls {
            debug!(%key, "native controls active, key ignored");
            return None;
        }
        if self.state.lock().closed {
            return None;
        }

        let command = KeyCommand::for_key(key, self.config.seek_step_secs);
        debug!(%key, ?command, "player key");
        let applied = match command {
            KeyCommand::Seek { delta_secs } => self.seek(|session| session.seek_by(delta_secs)),
            KeyCommand::TogglePause => self.toggle_pause(),
            KeyCommand::Back => {
                self.navigator.go_back();
                true
            }
            KeyCommand::ShowControls => {
                self.show_controls();
                true
            }
        };
        applied.then_some(command)
    }

    fn handle_signal(&self, signal: PlayerSignal) {
        let mut state = self.state.lock();
        if state.closed {
            debug!(?signal, "signal for closed session ignored");
            return;
        }
        if state.session.apply_signal(signal) {
            if state.session.transport_state() == TransportState::Error {
                error!(
                    media_id = %state.session.media_id(),
                    url = %state.session.source_url(),
                    error = state.session.last_error().unwrap_or_default(),
                    "playback failed"
                );
            }
            self.publish(&state);
        }
    }

    fn close(&self) {
        let subscription = self.key_subscription.lock().take();
        if let Some((bus, handle)) = subscription {
            bus.unsubscribe(handle);
        }

        let media_id = {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.timer.cancel();
            state.session.media_id().to_owned()
        };

        self.cancel.cancel();
        self.transport.stop();
        info!(%media_id, "playback session closed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio::time::sleep;

    use super::*;
    use crate::model::VideoType;
    use crate::playback::source::ResolvedSource;

    // ── Fakes ───────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        Start(String),
        Seek(f64),
        Pause,
        Resume,
        Stop,
    }

    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub(crate) calls: Mutex<Vec<Call>>,
    }

    impl MediaTransport for RecordingTransport {
        fn start(&self, request: &StartRequest) {
            self.calls.lock().push(Call::Start(request.source.url.clone()));
        }
        fn seek(&self, position_seconds: f64) {
            self.calls.lock().push(Call::Seek(position_seconds));
        }
        fn pause(&self) {
            self.calls.lock().push(Call::Pause);
        }
        fn resume(&self) {
            self.calls.lock().push(Call::Resume);
        }
        fn stop(&self) {
            self.calls.lock().push(Call::Stop);
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingNavigator {
        pub(crate) backs: Mutex<u32>,
        pub(crate) menus: Mutex<u32>,
    }

    impl Navigator for RecordingNavigator {
        fn open_global_menu(&self) {
            *self.menus.lock() += 1;
        }
        fn go_back(&self) {
            *self.backs.lock() += 1;
        }
    }

    pub(crate) fn target(id: &str, live: bool) -> PlaybackTarget {
        PlaybackTarget {
            media_id: id.into(),
            title: id.into(),
            source: ResolvedSource {
                url: format!("https://cdn.test/{id}.m3u8"),
                video_type: VideoType::Hls,
            },
            is_live_stream: live,
        }
    }

    struct Harness {
        controller: PlaybackSessionController,
        transport: Arc<RecordingTransport>,
        navigator: Arc<RecordingNavigator>,
    }

    fn open_with(live: bool, config: SessionConfig) -> Harness {
        let transport = Arc::new(RecordingTransport::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let controller = PlaybackSessionController::open(
            &target("m1", live),
            config,
            transport.clone(),
            navigator.clone(),
        )
        .unwrap();
        Harness {
            controller,
            transport,
            navigator,
        }
    }

    fn open(live: bool) -> Harness {
        open_with(live, SessionConfig::default())
    }

    fn loaded(duration: f64) -> Harness {
        let h = open(false);
        h.controller.handle_signal(PlayerSignal::Buffer(true));
        h.controller.handle_signal(PlayerSignal::Load(duration));
        h
    }

    // ── Controls countdown ──────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn controls_show_on_open_and_hide_after_delay() {
        let h = open(false);
        assert!(h.controller.snapshot().controls_visible());

        sleep(Duration::from_millis(2999)).await;
        assert!(h.controller.snapshot().controls_visible());

        sleep(Duration::from_millis(2)).await;
        assert!(!h.controller.snapshot().controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn resets_debounce_the_hide() {
        let h = open(false);
        h.controller.show_controls();

        sleep(Duration::from_millis(1000)).await;
        h.controller.show_controls();
        sleep(Duration::from_millis(1000)).await;
        h.controller.show_controls();

        sleep(Duration::from_millis(2999)).await;
        assert!(h.controller.snapshot().controls_visible(), "visible just before t=5000");

        sleep(Duration::from_millis(2)).await;
        assert!(!h.controller.snapshot().controls_visible(), "hidden just after t=5000");
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_the_countdown() {
        let h = open(false);
        let stream = h.controller.subscribe();
        h.controller.close();

        sleep(Duration::from_millis(5000)).await;
        assert!(stream.latest().controls_visible());
        assert!(h.controller.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn native_controls_skip_custom_controls_and_keys() {
        let h = open_with(
            false,
            SessionConfig {
                native_controls: true,
                ..SessionConfig::default()
            },
        );
        assert!(!h.controller.snapshot().controls_visible());

        assert_eq!(h.controller.handle_key(RemoteKey::Right), None);
        assert_eq!(h.controller.handle_key(RemoteKey::Back), None);
        assert_eq!(*h.navigator.backs.lock(), 0);
        assert_eq!(*h.transport.calls.lock(), [Call::Start("https://cdn.test/m1.m3u8".into())]);
    }

    // ── Key interpretation ──────────────────────────────────────────

    #[test]
    fn key_mapping() {
        assert_eq!(KeyCommand::for_key(RemoteKey::Right, 10.0), KeyCommand::Seek { delta_secs: 10.0 });
        assert_eq!(
            KeyCommand::for_key(RemoteKey::FastForward, 10.0),
            KeyCommand::Seek { delta_secs: 10.0 }
        );
        assert_eq!(KeyCommand::for_key(RemoteKey::Left, 10.0), KeyCommand::Seek { delta_secs: -10.0 });
        assert_eq!(KeyCommand::for_key(RemoteKey::Rewind, 10.0), KeyCommand::Seek { delta_secs: -10.0 });
        assert_eq!(KeyCommand::for_key(RemoteKey::Back, 10.0), KeyCommand::Back);
        assert_eq!(KeyCommand::for_key(RemoteKey::PlayPause, 10.0), KeyCommand::TogglePause);
        for key in [RemoteKey::Up, RemoteKey::Down, RemoteKey::Enter] {
            assert_eq!(KeyCommand::for_key(key, 10.0), KeyCommand::ShowControls);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn seek_keys_move_and_clamp() {
        let h = loaded(100.0);
        h.controller.handle_signal(PlayerSignal::Progress(95.0));

        h.controller.handle_key(RemoteKey::FastForward);
        assert!((h.controller.snapshot().position_seconds() - 100.0).abs() < f64::EPSILON);

        h.controller.seek_to(5.0);
        h.controller.handle_key(RemoteKey::Rewind);
        assert!(h.controller.snapshot().position_seconds().abs() < f64::EPSILON);

        let calls = h.transport.calls.lock().clone();
        assert_eq!(&calls[1..], [Call::Seek(100.0), Call::Seek(5.0), Call::Seek(0.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn seek_rearms_the_countdown() {
        let h = loaded(100.0);
        sleep(Duration::from_millis(2500)).await;
        h.controller.handle_key(RemoteKey::Right);

        sleep(Duration::from_millis(2500)).await;
        assert!(h.controller.snapshot().controls_visible());
        sleep(Duration::from_millis(600)).await;
        assert!(!h.controller.snapshot().controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn live_sessions_ignore_seek_and_pause() {
        let h = open(true);
        h.controller.handle_signal(PlayerSignal::Buffer(true));
        h.controller.handle_signal(PlayerSignal::Load(0.0));
        h.controller.handle_signal(PlayerSignal::Progress(30.0));

        assert_eq!(h.controller.handle_key(RemoteKey::Right), None);
        assert_eq!(h.controller.handle_key(RemoteKey::Left), None);
        assert_eq!(h.controller.handle_key(RemoteKey::PlayPause), None);
        assert_eq!(h.controller.handle_key(RemoteKey::Up), Some(KeyCommand::ShowControls));

        let snap = h.controller.snapshot();
        assert_eq!(snap.transport_state(), TransportState::Live);
        assert!((snap.position_seconds() - 30.0).abs() < f64::EPSILON);
        assert_eq!(h.transport.calls.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn play_pause_key_drives_transport() {
        let h = loaded(100.0);
        h.controller.handle_key(RemoteKey::PlayPause);
        assert_eq!(h.controller.snapshot().transport_state(), TransportState::Paused);
        h.controller.handle_key(RemoteKey::PlayPause);
        assert_eq!(h.controller.snapshot().transport_state(), TransportState::Playing);

        let calls = h.transport.calls.lock().clone();
        assert_eq!(&calls[1..], [Call::Pause, Call::Resume]);
    }

    #[tokio::test(start_paused = true)]
    async fn back_asks_the_navigator() {
        let h = loaded(100.0);
        assert_eq!(h.controller.handle_key(RemoteKey::Back), Some(KeyCommand::Back));
        assert_eq!(*h.navigator.backs.lock(), 1);
        assert!(!h.controller.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn errors_freeze_the_session() {
        let h = loaded(100.0);
        h.controller.handle_signal(PlayerSignal::Error("decoder gave up".into()));
        assert_eq!(h.controller.handle_key(RemoteKey::PlayPause), None);
        assert_eq!(h.controller.handle_key(RemoteKey::Right), None);
        assert_eq!(h.controller.take_last_key_command(), None);

        let snap = h.controller.snapshot();
        assert_eq!(snap.transport_state(), TransportState::Error);
        assert_eq!(snap.last_error(), Some("decoder gave up"));
        assert_eq!(h.transport.calls.lock().len(), 1);
    }

    // ── Bus + teardown ──────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn bus_keys_reach_the_session_until_close() {
        let bus = KeyEventBus::new();
        let h = loaded(100.0);
        h.controller.listen(&bus);
        assert_eq!(bus.len(), 1);

        bus.publish(RemoteKey::Right);
        assert!((h.controller.snapshot().position_seconds() - 10.0).abs() < f64::EPSILON);

        h.controller.close();
        assert!(bus.is_empty());
        bus.publish(RemoteKey::Right);
        assert!((h.controller.snapshot().position_seconds() - 10.0).abs() < f64::EPSILON);
        assert_eq!(h.transport.calls.lock().last(), Some(&Call::Stop));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_is_teardown() {
        let bus = KeyEventBus::new();
        let h = loaded(100.0);
        h.controller.listen(&bus);
        let transport = Arc::clone(&h.transport);

        drop(h);

        assert!(bus.is_empty());
        assert_eq!(transport.calls.lock().last(), Some(&Call::Stop));
        assert_eq!(
            transport.calls.lock().iter().filter(|c| **c == Call::Stop).count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_stream_sees_transitions() {
        let h = open(false);
        let mut stream = h.controller.subscribe();

        h.controller.handle_signal(PlayerSignal::Buffer(true));
        let next = stream.changed().await.unwrap();
        assert_eq!(next.transport_state(), TransportState::Buffering);
    }

    #[test]
    fn open_outside_a_runtime_fails() {
        let err = PlaybackSessionController::open(
            &target("m1", false),
            SessionConfig::default(),
            Arc::new(RecordingTransport::default()),
            Arc::new(RecordingNavigator::default()),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Runtime { .. }));
    }
}
