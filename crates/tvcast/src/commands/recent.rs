//! Most recently released items.

use std::sync::Arc;

use tabled::Tabled;

use tvcast_core::{MediaItem, format_duration, recent_items};

use super::{Context, util};
use crate::cli::RecentArgs;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct MediaRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Released")]
    released: String,
    #[tabled(rename = "Duration")]
    duration: String,
}

impl From<&Arc<MediaItem>> for MediaRow {
    fn from(m: &Arc<MediaItem>) -> Self {
        Self {
            id: m.id.clone(),
            title: m.title.clone(),
            released: util::format_date(m.release_date),
            duration: format_duration(m.content.duration_seconds),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context<'_>, args: &RecentArgs) -> Result<(), CliError> {
    let count = args.count.unwrap_or(ctx.config.catalog.recent_count);
    let snapshot = ctx.load_feed().await?;
    let items = recent_items(&snapshot, count);

    let out = output::render_list(ctx.format, &items, |m| MediaRow::from(m), |m| m.id.clone())?;
    output::print_output(&out, ctx.quiet());
    Ok(())
}
