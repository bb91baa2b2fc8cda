//! Details of one item.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tvcast_core::{
    ContentItem, ContentKind, PlaybackTarget, VideoType, find_content, format_duration, live_ids,
};

use super::{Context, util};
use crate::cli::ShowArgs;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ItemDetails {
    id: String,
    kind: ContentKind,
    title: String,
    short_description: String,
    duration: String,
    duration_seconds: f64,
    release_date: DateTime<Utc>,
    genres: Vec<String>,
    tags: Vec<String>,
    is_live: bool,
    playable_url: Option<String>,
    video_type: Option<VideoType>,
    validity_start: Option<DateTime<Utc>>,
    validity_end: Option<DateTime<Utc>>,
}

impl ItemDetails {
    fn new(item: &ContentItem, target: Option<&PlaybackTarget>) -> Self {
        let live = item.as_live();
        Self {
            id: item.id().to_owned(),
            kind: item.kind(),
            title: item.title().to_owned(),
            short_description: item.short_description().to_owned(),
            duration: format_duration(item.content().duration_seconds),
            duration_seconds: item.content().duration_seconds,
            release_date: item.release_date(),
            genres: item.genres().iter().cloned().collect(),
            tags: item.tags().iter().cloned().collect(),
            is_live: target.is_some_and(|t| t.is_live_stream),
            playable_url: target.map(|t| t.source.url.clone()),
            video_type: target.map(|t| t.source.video_type),
            validity_start: live.map(|f| f.validity_start),
            validity_end: live.map(|f| f.validity_end),
        }
    }
}

fn detail(d: &ItemDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::label(&d.title));
    if !d.short_description.is_empty() {
        let _ = writeln!(out, "{}", d.short_description);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "ID:        {} ({})", d.id, d.kind);
    let _ = writeln!(out, "Duration:  {}", d.duration);
    let _ = writeln!(out, "Released:  {}", util::format_date(d.release_date));
    if let (Some(start), Some(end)) = (d.validity_start, d.validity_end) {
        let _ = writeln!(
            out,
            "On air:    {} to {}",
            util::format_date(start),
            util::format_date(end)
        );
    }
    let _ = writeln!(out, "Live now:  {}", if d.is_live { "yes" } else { "no" });
    let _ = writeln!(out, "Genres:    {}", d.genres.join(", "));
    let _ = writeln!(out, "Tags:      {}", d.tags.join(", "));
    match (&d.playable_url, d.video_type) {
        (Some(url), Some(video_type)) => {
            let _ = write!(out, "Plays:     {url} [{video_type}]");
        }
        _ => {
            let _ = write!(out, "Plays:     not playable");
        }
    }
    out
}

pub async fn handle(ctx: &Context<'_>, args: &ShowArgs) -> Result<(), CliError> {
    let snapshot = ctx.load_feed().await?;
    let item = find_content(&snapshot, &args.id).ok_or_else(|| CliError::NotFound {
        resource_type: "item".into(),
        identifier: args.id.clone(),
        list_command: "recent".into(),
    })?;

    let target = if item.content().is_playable() {
        let live = live_ids(&snapshot, Utc::now());
        let rewrite = ctx.config.session_config().rewrite;
        Some(PlaybackTarget::for_content(&item, &live, &rewrite)?)
    } else {
        None
    };

    let details = ItemDetails::new(&item, target.as_ref());
    let out = output::render_single(ctx.format, &details, detail, |d| d.id.clone())?;
    output::print_output(&out, ctx.quiet());
    Ok(())
}
