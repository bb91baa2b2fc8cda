//! Command dispatch: bridges CLI args -> core classifier/session -> output.

pub mod config_cmd;
pub mod feed;
pub mod live;
pub mod play;
pub mod recent;
pub mod series;
pub mod show;
pub mod util;

use std::sync::Arc;

use tvcast_config::Config;
use tvcast_core::{ContentState, FeedSnapshot};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Resolved settings shared by every feed-backed command.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub config: Config,
    pub format: OutputFormat,
}

impl Context<'_> {
    pub fn quiet(&self) -> bool {
        self.global.quiet
    }

    /// Fetch the feed once. A failed fetch yields an empty snapshot and a
    /// warning rather than an error.
    pub async fn load_feed(&self) -> Result<Arc<FeedSnapshot>, CliError> {
        let store = util::load_store(self).await?;
        if let ContentState::Unavailable { message } = store.current() {
            output::warn(&format!("content feed unavailable: {message}"), self.quiet());
        }
        Ok(store.snapshot_or_empty())
    }
}

/// Dispatch a feed-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Feed => feed::handle(ctx).await,
        Command::Recent(args) => recent::handle(ctx, &args).await,
        Command::Series(args) => series::handle(ctx, args).await,
        Command::Live(args) => live::handle(ctx, &args).await,
        Command::Show(args) => show::handle(ctx, &args).await,
        Command::Play(args) => play::handle(ctx, args).await,
        Command::Config(args) => config_cmd::handle(args, ctx),
        // Completions are generated before a context exists
        Command::Completions(_) => Ok(()),
    }
}
