#![forbid(unsafe_code)]

//! `flowdesk`: validate, inspect and render flow-diagram snapshots.

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use flowdesk_config::EditorConfig;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = EditorConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let _logger = flowdesk_log::init_with(log_config(&cli, &config)).context("failed to initialize logging")?;
    tracing::debug!(command = ?cli.command, "starting");

    match cli.command {
        Command::Validate { file } => commands::validate(&file, cli.json).await,
        Command::Render(args) => commands::render(&args, &config, cli.json).await,
        Command::Inspect { file } => commands::inspect(&file, cli.json).await,
        Command::Shapes => commands::shapes(cli.json),
        Command::New { file, force } => commands::new_sample(&file, force).await,
    }
}

/// Warnings only unless a config file asks for more; the environment and
/// `-v` flags raise it further.
fn log_config(cli: &Cli, config: &EditorConfig) -> flowdesk_log::Config {
    let mut log = if cli.config.is_some() {
        config.log.clone()
    } else {
        flowdesk_log::Config::quiet()
    };
    if std::env::var_os(flowdesk_log::LOG_ENV).is_some() || std::env::var_os("RUST_LOG").is_some() {
        log.level = flowdesk_log::Config::from_env().level;
    }
    match cli.verbose {
        0 => {}
        1 => log.level = "debug".to_string(),
        _ => log.level = "trace".to_string(),
    }
    log
}
