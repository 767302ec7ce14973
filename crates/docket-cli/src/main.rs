#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;

use clap::Parser;
use docket_server::handler::routes;

use crate::config::Cli;

/// Tracing target for server shutdown events.
const TRACING_TARGET_SHUTDOWN: &str = "docket_cli::shutdown";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing();
    config::log_startup_info(&cli);

    let state = config::create_service_state(&cli).await?;
    let router = routes(state);

    server::serve(router, &cli.host, cli.port).await?;

    Ok(())
}
