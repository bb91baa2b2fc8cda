mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tvcast_config::{Config, ConfigError, LogFormat, LogSettings};

use crate::cli::{Cli, Command, ConfigArgs, ConfigCommand, GlobalOpts};
use crate::commands::{Context, util};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logging needs the config's level, so load before anything else
    let loaded = load_config(&cli.global);
    let log = loaded
        .as_ref()
        .map(|cfg| cfg.log.clone())
        .unwrap_or_default();
    init_tracing(cli.global.verbose, cli.global.quiet, &log);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli, loaded).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn load_config(global: &GlobalOpts) -> Result<Config, ConfigError> {
    match global.config {
        Some(ref path) => tvcast_config::load_config_from(path),
        None => tvcast_config::load_config(),
    }
}

fn init_tracing(verbosity: u8, quiet: bool, log: &LogSettings) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => log.level.as_str(),
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match log.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli, loaded: Result<Config, ConfigError>) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    // Shell completions generation
    if let Command::Completions(ref args) = command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "tvcast", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = match loaded {
        Ok(config) => config,
        // A broken file must not stop the user from locating or replacing it
        Err(err)
            if matches!(
                command,
                Command::Config(ConfigArgs {
                    command: ConfigCommand::Path | ConfigCommand::Init { .. }
                })
            ) =>
        {
            tracing::warn!(error = %err, "ignoring unreadable config");
            Config::default()
        }
        Err(err) => return Err(err.into()),
    };
    util::apply_overrides(&mut config, &global);

    let ctx = Context {
        format: util::output_format(&global, &config),
        global: &global,
        config,
    };

    tracing::debug!(command = ?command, "dispatching command");
    commands::dispatch(command, &ctx).await
}
