use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

mod cli;
mod commands;

use cli::{Cli, Commands};
use policy_loki::config::{Config, LogLevel};

fn setup_logging(log_level: LogLevel, log_file: Option<&Path>) -> Result<()> {
    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    if let Some(path) = log_file {
        let path = Config::expand_path(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }

        let target = Box::new(
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .context("Failed to open log file")?,
        );
        builder.target(env_logger::Target::Pipe(target));
        builder.init();

        info!("Logging initialized, writing to: {}", path.display());
    } else {
        builder.target(env_logger::Target::Stderr);
        builder.init();
    }

    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Push { input, host } => commands::push::run(&input, host.as_deref(), cli.quiet, &config),
        Commands::Preview { input } => commands::preview::run(&input, &config),
        Commands::Endpoint { host } => commands::endpoint::run(host.as_deref(), &config),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let log_level = if cli.verbose { LogLevel::Debug } else { config.log_level };
    setup_logging(log_level, config.log_file.as_deref()).context("Failed to setup logging")?;

    info!("Starting policy-loki with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
