//! Configuration for the tvcast tools.
//!
//! A TOML file in the platform config directory, layered with
//! `TVCAST_`-prefixed environment variables, and translated into the
//! runtime types `tvcast_core` consumes (`SessionConfig`, `FeedConfig`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use tvcast_core::config::{DEFAULT_RECENT_COUNT, DEFAULT_SEEK_STEP_SECS};
use tvcast_core::{FeedConfig, ManifestRewrite, SessionConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Feed document URL.
    pub feed_url: Option<String>,

    /// Output format used when `--output` is not given.
    #[serde(default = "default_output")]
    pub default_output: String,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub player: PlayerSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: None,
            default_output: default_output(),
            http: HttpSettings::default(),
            player: PlayerSettings::default(),
            catalog: CatalogSettings::default(),
            log: LogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerSettings {
    /// Milliseconds the on-screen controls stay up after the last key.
    #[serde(default = "default_controls_hide_ms")]
    pub controls_hide_ms: u64,

    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,

    /// The platform draws its own controls; remote keys are ignored.
    #[serde(default)]
    pub native_controls: bool,

    /// CDN whose manifest URLs are swapped for direct files. Empty disables it.
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,

    #[serde(default = "default_direct_path")]
    pub direct_path: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            controls_hide_ms: default_controls_hide_ms(),
            seek_step_secs: default_seek_step(),
            native_controls: false,
            cdn_host: default_cdn_host(),
            direct_path: default_direct_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            recent_count: default_recent_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogSettings {
    /// `tracing` filter directive used when no `-v` flag is given.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// How log lines are written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    tvcast_api::transport::DEFAULT_USER_AGENT.into()
}
fn default_controls_hide_ms() -> u64 {
    3000
}
fn default_seek_step() -> f64 {
    DEFAULT_SEEK_STEP_SECS
}
fn default_cdn_host() -> String {
    ManifestRewrite::default().host
}
fn default_direct_path() -> String {
    ManifestRewrite::default().direct_path
}
fn default_recent_count() -> usize {
    DEFAULT_RECENT_COUNT
}
fn default_log_level() -> String {
    "warn".into()
}

const OUTPUT_FORMATS: [&str; 5] = ["table", "json", "json-compact", "yaml", "plain"];

// ── Validation & translation ────────────────────────────────────────

impl Config {
    /// Check every field that can be wrong independently of the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref raw) = self.feed_url {
            parse_feed_url(raw)?;
        }
        if !OUTPUT_FORMATS.contains(&self.default_output.as_str()) {
            return Err(ConfigError::invalid(
                "default_output",
                format!(
                    "expected one of {}, got '{}'",
                    OUTPUT_FORMATS.join(", "),
                    self.default_output
                ),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::invalid("http.timeout_secs", "must be at least 1"));
        }
        if self.player.controls_hide_ms == 0 {
            return Err(ConfigError::invalid(
                "player.controls_hide_ms",
                "must be at least 1",
            ));
        }
        if !self.player.seek_step_secs.is_finite() || self.player.seek_step_secs <= 0.0 {
            return Err(ConfigError::invalid(
                "player.seek_step_secs",
                "must be a positive number",
            ));
        }
        if !self.player.cdn_host.is_empty() && !self.player.direct_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "player.direct_path",
                "must start with '/'",
            ));
        }
        if self.catalog.recent_count == 0 {
            return Err(ConfigError::invalid(
                "catalog.recent_count",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Playback behaviour for new sessions.
    pub fn session_config(&self) -> SessionConfig {
        let rewrite = if self.player.cdn_host.is_empty() {
            ManifestRewrite::disabled()
        } else {
            ManifestRewrite {
                host: self.player.cdn_host.to_ascii_lowercase(),
                direct_path: self.player.direct_path.clone(),
                ..ManifestRewrite::default()
            }
        };

        SessionConfig {
            controls_hide_delay: Duration::from_millis(self.player.controls_hide_ms),
            seek_step_secs: self.player.seek_step_secs,
            native_controls: self.player.native_controls,
            rewrite,
            ..SessionConfig::default()
        }
    }

    /// The config as it would be written to disk.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Feed endpoint and transport settings. Fails when no URL is set.
    pub fn feed_config(&self) -> Result<FeedConfig, ConfigError> {
        let raw = self
            .feed_url
            .as_deref()
            .ok_or_else(|| ConfigError::invalid("feed_url", "not set"))?;

        Ok(FeedConfig {
            url: parse_feed_url(raw)?,
            timeout: Duration::from_secs(self.http.timeout_secs),
            user_agent: self.http.user_agent.clone(),
        })
    }
}

fn parse_feed_url(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw
        .parse()
        .map_err(|e| ConfigError::invalid("feed_url", format!("invalid URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::invalid(
            "feed_url",
            format!("unsupported scheme '{other}'"),
        )),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "tvcast", "tvcast").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tvcast");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment. A missing file is not
/// an error; defaults and env vars still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TVCAST_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if loading fails for any reason.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, cfg.to_toml()?)?;
    Ok(())
}
