// ── Single active session ──
//
// Screens come and go; at most one of them plays at a time. Opening a new
// session tears the previous one down before the new one starts.

use std::sync::Arc;

use parking_lot::Mutex;

use super::controller::{KeyCommand, PlaybackSessionController};
use super::session::PlaybackSession;
use super::source::PlaybackTarget;
use super::state::PlayerSignal;
use super::transport::MediaTransport;
use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::input::{KeyEventBus, RemoteKey};
use crate::navigation::Navigator;
use crate::stream::SnapshotStream;

/// Holds the active [`PlaybackSessionController`], if any.
pub struct SessionHost {
    current: Mutex<Option<PlaybackSessionController>>,
    bus: KeyEventBus,
    config: SessionConfig,
    transport: Arc<dyn MediaTransport>,
    navigator: Arc<dyn Navigator>,
}

impl SessionHost {
    pub fn new(
        bus: KeyEventBus,
        config: SessionConfig,
        transport: Arc<dyn MediaTransport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            current: Mutex::new(None),
            bus,
            config,
            transport,
            navigator,
        }
    }

    /// Close whatever is playing, then open `target` and route bus keys to it.
    pub fn open(&self, target: &PlaybackTarget) -> Result<SnapshotStream<PlaybackSession>, CoreError> {
        self.close();

        let controller = PlaybackSessionController::open(
            target,
            self.config.clone(),
            Arc::clone(&self.transport),
            Arc::clone(&self.navigator),
        )?;
        controller.listen(&self.bus);
        let stream = controller.subscribe();

        let replaced = self.current.lock().replace(controller);
        drop(replaced);
        Ok(stream)
    }

    /// Tear down the active session, if any.
    pub fn close(&self) {
        let previous = self.current.lock().take();
        drop(previous);
    }

    pub fn is_active(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Snapshot of the active session.
    pub fn snapshot(&self) -> Option<PlaybackSession> {
        self.current.lock().as_ref().map(PlaybackSessionController::snapshot)
    }

    /// Forward a player callback to the active session.
    pub fn signal(&self, signal: PlayerSignal) {
        if let Some(controller) = self.current.lock().as_ref() {
            controller.handle_signal(signal);
        }
    }

    /// Publish a key on the host's bus and report what the active session
    /// did with it. `None` when nothing is playing, keys are suppressed, or
    /// the command had no effect.
    pub fn press(&self, key: RemoteKey) -> Option<KeyCommand> {
        if let Some(controller) = self.current.lock().as_ref() {
            controller.take_last_key_command();
        }
        self.bus.publish(key);
        self.current
            .lock()
            .as_ref()
            .and_then(PlaybackSessionController::take_last_key_command)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::playback::controller::tests::{Call, RecordingNavigator, RecordingTransport, target};

    fn host() -> (SessionHost, Arc<RecordingTransport>, KeyEventBus) {
        let bus = KeyEventBus::new();
        let transport = Arc::new(RecordingTransport::default());
        let host = SessionHost::new(
            bus.clone(),
            SessionConfig::default(),
            transport.clone(),
            Arc::new(RecordingNavigator::default()),
        );
        (host, transport, bus)
    }

    #[tokio::test(start_paused = true)]
    async fn opening_a_session_closes_the_previous_one() {
        let (host, transport, bus) = host();
        host.open(&target("a", false)).unwrap();
        host.open(&target("b", false)).unwrap();

        assert_eq!(bus.len(), 1);
        assert_eq!(host.snapshot().unwrap().media_id(), "b");
        assert_eq!(
            *transport.calls.lock(),
            [
                Call::Start("https://cdn.test/a.m3u8".into()),
                Call::Stop,
                Call::Start("https://cdn.test/b.m3u8".into()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_never_hides_the_successor() {
        let (host, _transport, _bus) = host();
        host.open(&target("a", false)).unwrap();

        sleep(Duration::from_millis(2000)).await;
        host.open(&target("b", false)).unwrap();

        sleep(Duration::from_millis(1500)).await;
        assert!(host.snapshot().unwrap().controls_visible(), "a's countdown must not leak into b");

        sleep(Duration::from_millis(1600)).await;
        assert!(!host.snapshot().unwrap().controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn keys_and_signals_reach_the_active_session() {
        let (host, transport, _bus) = host();
        host.open(&target("a", false)).unwrap();
        host.signal(PlayerSignal::Load(60.0));

        assert_eq!(host.press(RemoteKey::Right), Some(KeyCommand::Seek { delta_secs: 10.0 }));
        assert!((host.snapshot().unwrap().position_seconds() - 10.0).abs() < f64::EPSILON);
        assert_eq!(transport.calls.lock().last(), Some(&Call::Seek(10.0)));

        host.close();
        assert!(!host.is_active());
        assert_eq!(host.press(RemoteKey::Right), None);
    }

    #[tokio::test(start_paused = true)]
    async fn press_reports_only_commands_that_took_effect() {
        let (host, transport, _bus) = host();
        host.open(&target("live", true)).unwrap();
        host.signal(PlayerSignal::Load(0.0));
        assert_eq!(host.press(RemoteKey::Right), None);
        assert_eq!(host.press(RemoteKey::PlayPause), None);
        assert_eq!(host.press(RemoteKey::Enter), Some(KeyCommand::ShowControls));

        host.open(&target("vod", false)).unwrap();
        host.signal(PlayerSignal::Load(60.0));
        host.signal(PlayerSignal::Error("decoder gave up".into()));
        assert_eq!(host.press(RemoteKey::Right), None);
        assert_eq!(host.press(RemoteKey::PlayPause), None);
        assert_eq!(transport.calls.lock().iter().filter(|c| matches!(c, Call::Seek(_))).count(), 0);
    }
}
