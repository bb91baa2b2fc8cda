//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tvcast_config::ConfigError;
use tvcast_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Feed ─────────────────────────────────────────────────────────
    #[error("No feed source configured")]
    #[diagnostic(
        code(tvcast::no_feed),
        help(
            "Pass --feed-url or --feed-file, set TVCAST_FEED_URL,\n\
             or run: tvcast config init\n\
             Config expected at: {path}"
        )
    )]
    NoFeedSource { path: String },

    #[error("Content feed unavailable: {message}")]
    #[diagnostic(
        code(tvcast::feed_unavailable),
        help("Check the feed URL and your connection, or use --feed-file.")
    )]
    FeedUnavailable { message: String },

    #[error("Could not read feed file {path}: {message}")]
    #[diagnostic(code(tvcast::feed_file))]
    FeedFile { path: String, message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(tvcast::not_found),
        help("Run: tvcast {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Playback ─────────────────────────────────────────────────────
    #[error("Playback failed: {message}")]
    #[diagnostic(code(tvcast::playback))]
    Playback { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tvcast::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(tvcast::config),
        help("Inspect the file with: tvcast config show")
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(tvcast::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(tvcast::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(tvcast::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::FeedUnavailable { .. } => exit_code::CONNECTION,
            Self::Validation { .. } | Self::NoFeedSource { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fetch { message } => CliError::FeedUnavailable { message },

            CoreError::NotFound { kind, id } => CliError::NotFound {
                resource_type: kind,
                identifier: id,
                list_command: "recent".into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "feed_url".into(),
                reason: message,
            },

            CoreError::Playback { message }
            | CoreError::InvariantViolation { message }
            | CoreError::Runtime { message } => CliError::Playback { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_exits_with_four() {
        let err: CliError = CoreError::NotFound {
            kind: "item".into(),
            id: "m9".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "item 'm9' not found");
    }

    #[test]
    fn fetch_failures_are_connection_errors() {
        let err: CliError = CoreError::Fetch {
            message: "timed out".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn config_validation_is_a_usage_error_path() {
        let err: CliError = ConfigError::Validation {
            field: "catalog.recent_count".into(),
            reason: "must be at least 1".into(),
        }
        .into();
        assert!(err.to_string().contains("catalog.recent_count"));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
