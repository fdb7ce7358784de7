use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anime_tracker_lib::bootstrap::{self, init_tracing_subscriber, resolve_config};
use anime_tracker_lib::cli::{self, Cli};
use anime_tracker_lib::console::ConsoleNotices;
use clap::Parser;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let resolved = resolve_config(args.config)?;
    let config = &resolved.config;

    let log_directory = Some(config.log_directory.as_str())
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from);
    if let Err(err) = init_tracing_subscriber(log_directory.as_deref()) {
        eprintln!("Failed to initialize tracing: {err}");
    }
    resolved.log_source();

    let services = bootstrap::wire(config, Arc::new(ConsoleNotices))?;
    cli::execute(args.command, &services).await
}
