//! Provider summary.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tvcast_core::home_rows;

use super::{Context, util};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct FeedSummary {
    provider_name: String,
    language: String,
    last_updated: Option<DateTime<Utc>>,
    items: usize,
    live_feeds: usize,
    live_now: usize,
    series: usize,
}

fn detail(summary: &FeedSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", output::label("Provider:"), summary.provider_name);
    let _ = writeln!(out, "{}  {}", output::label("Language:"), summary.language);
    let updated = summary
        .last_updated
        .map_or_else(|| "unknown".to_owned(), util::format_date);
    let _ = writeln!(out, "{}   {updated}", output::label("Updated:"));
    let _ = writeln!(out, "{}     {}", output::label("Items:"), summary.items);
    let _ = writeln!(
        out,
        "{}      {} ({} on air)",
        output::label("Live:"),
        summary.live_feeds,
        summary.live_now
    );
    let _ = write!(out, "{}    {}", output::label("Series:"), summary.series);
    out
}

pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    let snapshot = ctx.load_feed().await?;
    let rows = home_rows(&snapshot, Utc::now(), ctx.config.catalog.recent_count);

    let summary = FeedSummary {
        provider_name: snapshot.provider_name.clone(),
        language: snapshot.language.clone(),
        last_updated: snapshot.last_updated,
        items: snapshot.items.len(),
        live_feeds: snapshot.live_feeds.len(),
        live_now: rows.live.len(),
        series: rows.series.len(),
    };

    let out = output::render_single(ctx.format, &summary, detail, |s| s.provider_name.clone())?;
    output::print_output(&out, ctx.quiet());
    Ok(())
}
