//! Live feeds on air at an instant.

use std::sync::Arc;

use chrono::Utc;
use tabled::Tabled;

use tvcast_core::{LiveFeed, live_now};

use super::{Context, util};
use crate::cli::LiveArgs;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct LiveRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Ends")]
    ends: String,
}

impl From<&Arc<LiveFeed>> for LiveRow {
    fn from(f: &Arc<LiveFeed>) -> Self {
        Self {
            id: f.item.id.clone(),
            title: f.item.title.clone(),
            starts: util::format_date(f.validity_start),
            ends: util::format_date(f.validity_end),
        }
    }
}

pub async fn handle(ctx: &Context<'_>, args: &LiveArgs) -> Result<(), CliError> {
    let at = args.at.unwrap_or_else(Utc::now);
    let snapshot = ctx.load_feed().await?;
    let feeds = live_now(&snapshot, at);

    let out = output::render_list(ctx.format, &feeds, |f| LiveRow::from(f), |f| f.item.id.clone())?;
    output::print_output(&out, ctx.quiet());
    Ok(())
}
