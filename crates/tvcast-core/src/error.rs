// ── Core error types ──
//
// User-facing errors from tvcast-core. Consumers never see HTTP status
// codes or JSON parse failures directly: `From<tvcast_api::Error>` folds
// every transport failure into `Fetch`, which screens recover from by
// showing empty content.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Content ──────────────────────────────────────────────────────
    #[error("Content feed unavailable: {message}")]
    Fetch { message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    // ── Playback ─────────────────────────────────────────────────────
    #[error("Playback failed: {message}")]
    Playback { message: String },

    // ── Programming errors ───────────────────────────────────────────
    /// A broken data or usage invariant (e.g. an item with no video
    /// variants reached the player). Callers should fail fast.
    #[error("Invariant violated: {message}")]
    InvariantViolation { message: String },

    // ── Configuration / environment ──────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Runtime unavailable: {message}")]
    Runtime { message: String },
}

impl CoreError {
    /// Returns `true` for errors a screen should absorb into an empty state.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tvcast_api::Error> for CoreError {
    fn from(err: tvcast_api::Error) -> Self {
        match err {
            tvcast_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid feed URL: {e}"),
            },
            tvcast_api::Error::ClientBuild(message) => CoreError::Config { message },
            tvcast_api::Error::Deserialization { message, body: _ } => CoreError::Fetch {
                message: format!("malformed feed document: {message}"),
            },
            other => CoreError::Fetch {
                message: other.to_string(),
            },
        }
    }
}
