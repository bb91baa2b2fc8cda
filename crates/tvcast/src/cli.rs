//! Clap derive structures for the `tvcast` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tvcast -- browse a video feed and drive playback sessions
#[derive(Debug, Parser)]
#[command(
    name = "tvcast",
    version,
    about = "Browse a TV video feed and simulate remote-controlled playback",
    long_about = "Fetches a provider's content feed, groups it the way the TV home \
        screen does (recent, live now, series), and opens playback sessions \
        that react to remote-control keys against a simulated player.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the platform default
    #[arg(long, env = "TVCAST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Feed document URL (overrides config)
    #[arg(long, env = "TVCAST_FEED_URL", global = true, conflicts_with = "feed_file")]
    pub feed_url: Option<String>,

    /// Read the feed document from a local JSON file
    #[arg(long, global = true)]
    pub feed_file: Option<PathBuf>,

    /// Output format (defaults to the config's default_output)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the provider summary
    Feed,

    /// List the most recently released items
    #[command(alias = "r")]
    Recent(RecentArgs),

    /// List series, or the episodes of one series
    #[command(alias = "s")]
    Series(SeriesArgs),

    /// List live feeds airing at an instant
    Live(LiveArgs),

    /// Show details of one item
    Show(ShowArgs),

    /// Open a playback session and drive it with remote keys
    Play(PlayArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Catalog ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecentArgs {
    /// Number of items (defaults to catalog.recent_count)
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Series name; lists its items instead of all series
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct LiveArgs {
    /// Instant to check, RFC 3339 (defaults to now)
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Item or live feed id
    pub id: String,
}

// ── Playback ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Item or live feed id
    pub id: String,

    /// Comma-separated keys (up, down, left, right, enter, back,
    /// play-pause, fast-forward, rewind). Reads one key per stdin line
    /// when omitted.
    #[arg(long, short = 'k', value_delimiter = ',')]
    pub keys: Option<Vec<String>>,

    /// Pause between keys, in milliseconds of simulated playback
    #[arg(long, default_value = "1000")]
    pub key_interval_ms: u64,

    /// Pretend the platform draws its own controls (keys are ignored)
    #[arg(long)]
    pub native_controls: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the resolved configuration
    Show,

    /// Create the config file
    Init {
        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
