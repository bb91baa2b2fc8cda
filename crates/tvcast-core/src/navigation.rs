// ── Navigation collaborator ──
//
// The core never owns a screen stack. It asks whoever does to open the
// global menu or to go back.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// Something that can change the visible screen.
pub trait Navigator: Send + Sync {
    /// Reveal the app-wide menu (the drawer).
    fn open_global_menu(&self);
    /// Leave the current screen.
    fn go_back(&self);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn open_global_menu(&self) {
        (**self).open_global_menu();
    }

    fn go_back(&self) {
        (**self).go_back();
    }
}

/// A navigation request as seen by an event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationRequest {
    OpenGlobalMenu,
    GoBack,
}

/// [`Navigator`] that forwards requests over an unbounded channel, for
/// UIs that process navigation on their own loop.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<NavigationRequest>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NavigationRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, request: NavigationRequest) {
        if self.tx.send(request).is_err() {
            debug!(?request, "navigation receiver dropped");
        }
    }
}

impl Navigator for ChannelNavigator {
    fn open_global_menu(&self) {
        self.send(NavigationRequest::OpenGlobalMenu);
    }

    fn go_back(&self) {
        self.send(NavigationRequest::GoBack);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn channel_navigator_forwards_in_order() {
        let (nav, mut rx) = ChannelNavigator::new();
        nav.open_global_menu();
        nav.go_back();

        assert_eq!(rx.try_recv().unwrap(), NavigationRequest::OpenGlobalMenu);
        assert_eq!(rx.try_recv().unwrap(), NavigationRequest::GoBack);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_is_not_an_error() {
        let (nav, rx) = ChannelNavigator::new();
        drop(rx);
        nav.go_back();
    }
}
