//! Single-shot, restartable countdown that hides on-screen controls.
//!
//! Each re-arm cancels the pending countdown's token and bumps the
//! generation. An expiring countdown only counts if its generation is
//! still current and its token is still live, both checked under the
//! session lock, so a countdown that loses the race to a re-arm or a
//! teardown is a no-op.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Countdown bookkeeping kept inside the session lock.
#[derive(Debug)]
pub(crate) struct ControlsTimer {
    delay: Duration,
    session: CancellationToken,
    pending: Option<CancellationToken>,
    generation: u64,
}

/// One armed countdown, ready to be awaited on a spawned task.
#[derive(Debug)]
pub(crate) struct Countdown {
    pub(crate) generation: u64,
    token: CancellationToken,
    delay: Duration,
}

impl ControlsTimer {
    pub(crate) fn new(delay: Duration, session: CancellationToken) -> Self {
        Self {
            delay,
            session,
            pending: None,
            generation: 0,
        }
    }

    /// Cancel any pending countdown and start a fresh one.
    pub(crate) fn rearm(&mut self) -> Countdown {
        self.cancel();
        self.generation += 1;
        let token = self.session.child_token();
        self.pending = Some(token.clone());
        Countdown {
            generation: self.generation,
            token,
            delay: self.delay,
        }
    }

    /// Consume an expiry. `true` only for the current, uncancelled countdown.
    pub(crate) fn expire(&mut self, generation: u64) -> bool {
        let current = generation == self.generation
            && self
                .pending
                .as_ref()
                .is_some_and(|token| !token.is_cancelled());
        if current {
            self.pending = None;
        }
        current
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Countdown {
    /// Sleep out the delay. `None` if cancelled first.
    pub(crate) async fn finish(self) -> Option<u64> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            () = tokio::time::sleep(self.delay) => Some(self.generation),
        }
    }
}
