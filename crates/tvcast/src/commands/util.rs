//! Shared helpers for command handlers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use tvcast_api::FeedResponse;
use tvcast_config::Config;
use tvcast_core::{CoreError, FeedSnapshot, FeedSource, FeedStore, feed_client};

use super::Context;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Settings ─────────────────────────────────────────────────────────

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(config: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.feed_url {
        config.feed_url = Some(url.clone());
    }
    if let Some(timeout) = global.timeout {
        config.http.timeout_secs = timeout;
    }
}

/// `--output`, else the config's `default_output`, else table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.default_output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Render a timestamp the way every table does.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

// ── Feed sources ─────────────────────────────────────────────────────

/// A feed document stored on disk.
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl FeedSource for FileFeed {
    async fn fetch(&self) -> Result<FeedSnapshot, CoreError> {
        debug!(path = %self.path.display(), "reading feed file");
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::Fetch {
                message: format!("{}: {e}", self.path.display()),
            })?;
        let response: FeedResponse =
            serde_json::from_str(&body).map_err(|e| CoreError::Fetch {
                message: format!("malformed feed document {}: {e}", self.path.display()),
            })?;
        Ok(FeedSnapshot::from(response))
    }
}

/// Load the feed from `--feed-file` or the configured URL.
pub async fn load_store(ctx: &Context<'_>) -> Result<FeedStore, CliError> {
    let store = FeedStore::new();
    let spinner = spinner(ctx.quiet());

    if let Some(ref path) = ctx.global.feed_file {
        spinner.set_message(format!("Reading {}", path.display()));
        store.load(&FileFeed::new(path), Utc::now()).await;
    } else {
        if ctx.config.feed_url.is_none() {
            spinner.finish_and_clear();
            return Err(CliError::NoFeedSource {
                path: config_file(ctx.global).display().to_string(),
            });
        }
        let feed = ctx.config.feed_config()?;
        spinner.set_message(format!("Fetching {}", feed.url));
        let client = feed_client(&feed)?;
        store.load(&client, Utc::now()).await;
    }

    spinner.finish_and_clear();
    Ok(store)
}

fn spinner(quiet: bool) -> ProgressBar {
    if !output::stderr_is_interactive(quiet) {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// The config file in effect: `--config` or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(tvcast_config::config_path)
}

/// Map a dialoguer failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
