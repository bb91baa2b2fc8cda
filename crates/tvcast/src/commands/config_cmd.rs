//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input};

use tvcast_config::{Config, save_config_to};

use super::{Context, util};
use crate::cli::{ConfigArgs, ConfigCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Ask for a feed URL on a terminal; otherwise there is nothing to ask.
fn prompt_feed_url(current: Option<&str>) -> Result<Option<String>, CliError> {
    if !std::io::stdin().is_terminal() {
        return Ok(current.map(str::to_owned));
    }
    let mut input = Input::<String>::new()
        .with_prompt("Feed URL")
        .allow_empty(true);
    if let Some(url) = current {
        input = input.default(url.to_owned());
    }
    let url = input.interact_text().map_err(util::prompt_err)?;
    Ok(Some(url).filter(|u| !u.trim().is_empty()))
}

pub fn handle(args: ConfigArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let path = util::config_file(ctx.global);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), ctx.quiet());
            Ok(())
        }

        ConfigCommand::Show => {
            let out = match ctx.format {
                OutputFormat::Table | OutputFormat::Plain => ctx.config.to_toml()?,
                format => output::render_structured(format, &ctx.config)?,
            };
            output::print_output(out.trim_end(), ctx.quiet());
            Ok(())
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                let overwrite = std::io::stdin().is_terminal()
                    && Confirm::new()
                        .with_prompt(format!("Overwrite {}?", path.display()))
                        .default(false)
                        .interact()
                        .map_err(util::prompt_err)?;
                if !overwrite {
                    return Err(CliError::ConfigExists {
                        path: path.display().to_string(),
                    });
                }
            }

            let cfg = Config {
                feed_url: prompt_feed_url(ctx.config.feed_url.as_deref())?,
                ..ctx.config.clone()
            };
            save_config_to(&cfg, &path)?;

            if !ctx.quiet() {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}
