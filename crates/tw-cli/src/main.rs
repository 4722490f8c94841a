use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tw_config::TaskwardConfig;

mod cli;
mod commands;
mod context;
mod output;
mod write_lock;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("tw error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    let config = TaskwardConfig::load_with_dotenv().context("failed to load taskward config")?;
    let ctx = context::AppContext::init(config, flags.root.as_deref());

    let command = cli.command;
    let write_lock = if command.requires_write_lock() {
        Some(write_lock::acquire_for_root(ctx.tasks_root()).await?)
    } else {
        None
    };

    let result = commands::dispatch::dispatch(command, &ctx, &flags);
    drop(write_lock);
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKWARD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
