//! Drive a playback session with remote keys against a simulated player.
//!
//! The simulated player answers `start` with a buffer/load/ready sequence,
//! echoes seeks back as progress, and advances its playhead by the key
//! interval between keys. `back` ends the run.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tabled::Tabled;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::debug;

use tvcast_core::{
    ChannelNavigator, KeyCommand, KeyEventBus, MediaTransport, NavigationRequest,
    PlaybackSession, PlaybackTarget, PlayerSignal, RemoteKey, SessionHost, StartRequest,
    TransportState, find_content, format_duration, live_ids,
};

use super::Context;
use crate::cli::PlayArgs;
use crate::error::CliError;
use crate::output;

// ── Simulated player ─────────────────────────────────────────────────

/// A `MediaTransport` that reports back through a signal channel.
struct SimulatedPlayer {
    signals: mpsc::UnboundedSender<PlayerSignal>,
    duration_seconds: f64,
}

impl SimulatedPlayer {
    fn emit(&self, signal: PlayerSignal) {
        if self.signals.send(signal).is_err() {
            debug!("simulated player outlived its session");
        }
    }
}

impl MediaTransport for SimulatedPlayer {
    fn start(&self, request: &StartRequest) {
        debug!(url = %request.source.url, video_type = %request.source.video_type, "player start");
        self.emit(PlayerSignal::Buffer(true));
        self.emit(PlayerSignal::Load(if request.is_live_stream {
            0.0
        } else {
            self.duration_seconds
        }));
        self.emit(PlayerSignal::Buffer(false));
    }

    fn seek(&self, position_seconds: f64) {
        self.emit(PlayerSignal::Progress(position_seconds));
    }

    fn pause(&self) {
        debug!("player pause");
    }

    fn resume(&self) {
        debug!("player resume");
    }

    fn stop(&self) {
        debug!("player stop");
    }
}

/// Feed queued player signals to the active session.
fn pump(host: &SessionHost, signals: &mut mpsc::UnboundedReceiver<PlayerSignal>) {
    while let Ok(signal) = signals.try_recv() {
        host.signal(signal);
    }
}

/// Move the playhead forward by `elapsed` while on-demand content plays.
fn advance_playhead(host: &SessionHost, elapsed: Duration) {
    let Some(session) = host.snapshot() else {
        return;
    };
    if session.transport_state() != TransportState::Playing {
        return;
    }
    let next = session.position_seconds() + elapsed.as_secs_f64();
    match session.duration_seconds() {
        Some(duration) if next >= duration => {
            host.signal(PlayerSignal::Progress(duration));
            host.signal(PlayerSignal::End);
        }
        _ => host.signal(PlayerSignal::Progress(next)),
    }
}

// ── Key input ────────────────────────────────────────────────────────

enum KeyInput {
    Listed(std::vec::IntoIter<String>),
    Stdin(Lines<BufReader<Stdin>>),
}

impl KeyInput {
    fn new(keys: Option<Vec<String>>) -> Self {
        match keys {
            Some(keys) => Self::Listed(keys.into_iter()),
            None => Self::Stdin(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    async fn next(&mut self) -> Result<Option<RemoteKey>, CliError> {
        loop {
            let raw = match self {
                Self::Listed(keys) => keys.next(),
                Self::Stdin(lines) => lines.next_line().await?,
            };
            let Some(raw) = raw else {
                return Ok(None);
            };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            return raw.parse().map(Some).map_err(|_| CliError::Validation {
                field: "keys".into(),
                reason: format!(
                    "unknown key '{raw}' (expected up, down, left, right, enter, back, \
                     play-pause, fast-forward or rewind)"
                ),
            });
        }
    }
}

// ── Frames ───────────────────────────────────────────────────────────

/// The session as it stood after one key.
#[derive(Debug, Serialize)]
struct Frame {
    step: usize,
    key: Option<RemoteKey>,
    command: Option<KeyCommand>,
    navigation: Option<NavigationRequest>,
    session: PlaybackSession,
}

#[derive(Tabled)]
struct FrameRow {
    #[tabled(rename = "#")]
    step: usize,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Controls")]
    controls: String,
}

fn describe(command: Option<KeyCommand>, navigation: Option<NavigationRequest>) -> String {
    let base = match command {
        None => String::new(),
        Some(KeyCommand::Seek { delta_secs }) => format!("seek {delta_secs:+}s"),
        Some(KeyCommand::TogglePause) => "toggle pause".into(),
        Some(KeyCommand::Back) => "back".into(),
        Some(KeyCommand::ShowControls) => "show controls".into(),
    };
    match navigation {
        Some(NavigationRequest::GoBack) => format!("{base} (leave player)"),
        Some(NavigationRequest::OpenGlobalMenu) => format!("{base} (menu)"),
        None => base,
    }
}

impl From<&Frame> for FrameRow {
    fn from(f: &Frame) -> Self {
        let s = &f.session;
        let position = match s.duration_seconds() {
            _ if s.is_live_stream() => "live".to_owned(),
            Some(duration) => format!(
                "{} / {}",
                format_duration(s.position_seconds()),
                format_duration(duration)
            ),
            None => format_duration(s.position_seconds()),
        };
        let state = match (s.last_error(), s.buffering_message()) {
            (Some(error), _) => format!("{} ({error})", output::state_label(s.transport_state())),
            (None, Some(message)) => {
                format!("{} ({message})", output::state_label(s.transport_state()))
            }
            (None, None) => output::state_label(s.transport_state()),
        };
        Self {
            step: f.step,
            key: f.key.map(|k| k.to_string()).unwrap_or_default(),
            command: describe(f.command, f.navigation),
            state,
            position,
            controls: if s.controls_visible() { "shown" } else { "hidden" }.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context<'_>, args: PlayArgs) -> Result<(), CliError> {
    let snapshot = ctx.load_feed().await?;
    let item = find_content(&snapshot, &args.id).ok_or_else(|| CliError::NotFound {
        resource_type: "item".into(),
        identifier: args.id.clone(),
        list_command: "recent".into(),
    })?;

    let mut config = ctx.config.session_config();
    config.native_controls |= args.native_controls;
    let live = live_ids(&snapshot, Utc::now());
    let target = PlaybackTarget::for_content(&item, &live, &config.rewrite)?;

    let (signal_tx, mut signals) = mpsc::unbounded_channel();
    let (navigator, mut navigation) = ChannelNavigator::new();
    let player = SimulatedPlayer {
        signals: signal_tx,
        duration_seconds: item.content().duration_seconds,
    };
    let host = SessionHost::new(
        KeyEventBus::new(),
        config,
        Arc::new(player),
        Arc::new(navigator),
    );

    host.open(&target)?;
    pump(&host, &mut signals);

    let mut frames = Vec::new();
    if let Some(session) = host.snapshot() {
        frames.push(Frame {
            step: 0,
            key: None,
            command: None,
            navigation: None,
            session,
        });
    }

    let interval = Duration::from_millis(args.key_interval_ms);
    let mut input = KeyInput::new(args.keys);
    let mut step = 0;
    while let Some(key) = input.next().await? {
        step += 1;
        let command = host.press(key);
        pump(&host, &mut signals);
        let nav = navigation.try_recv().ok();

        if let Some(session) = host.snapshot() {
            frames.push(Frame {
                step,
                key: Some(key),
                command,
                navigation: nav,
                session,
            });
        }
        if nav == Some(NavigationRequest::GoBack) {
            break;
        }

        tokio::time::sleep(interval).await;
        advance_playhead(&host, interval);
        pump(&host, &mut signals);
    }

    host.close();

    let out = output::render_list(
        ctx.format,
        &frames,
        |f| FrameRow::from(f),
        |f| f.session.transport_state().to_string(),
    )?;
    output::print_output(&out, ctx.quiet());
    Ok(())
}
