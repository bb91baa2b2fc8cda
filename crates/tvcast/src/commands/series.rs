//! Series listing.

use serde::Serialize;
use tabled::Tabled;

use tvcast_core::{SeriesGroup, find_series, series_groups};

use super::Context;
use super::recent::MediaRow;
use crate::cli::SeriesArgs;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct SeriesSummary {
    name: String,
    episodes: usize,
    thumbnail_url: Option<String>,
}

impl From<&SeriesGroup> for SeriesSummary {
    fn from(group: &SeriesGroup) -> Self {
        Self {
            name: group.name.clone(),
            episodes: group.len(),
            thumbnail_url: group.thumbnail_url().map(str::to_owned),
        }
    }
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Series")]
    name: String,
    #[tabled(rename = "Episodes")]
    episodes: usize,
}

impl From<&SeriesSummary> for SeriesRow {
    fn from(s: &SeriesSummary) -> Self {
        Self {
            name: s.name.clone(),
            episodes: s.episodes,
        }
    }
}

pub async fn handle(ctx: &Context<'_>, args: SeriesArgs) -> Result<(), CliError> {
    let snapshot = ctx.load_feed().await?;

    let out = match args.name {
        None => {
            let summaries: Vec<SeriesSummary> = series_groups(&snapshot)
                .iter()
                .map(SeriesSummary::from)
                .collect();
            output::render_list(ctx.format, &summaries, |s| SeriesRow::from(s), |s| s.name.clone())?
        }
        Some(name) => {
            let group = find_series(&snapshot, &name).ok_or_else(|| CliError::NotFound {
                resource_type: "series".into(),
                identifier: name,
                list_command: "series".into(),
            })?;
            output::render_list(ctx.format, &group.items, |m| MediaRow::from(m), |m| m.id.clone())?
        }
    };

    output::print_output(&out, ctx.quiet());
    Ok(())
}
