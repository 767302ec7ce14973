//! HTTP server startup and graceful shutdown.

use anyhow::Context;
use axum::Router;

/// Tracing target for server startup events.
const TRACING_TARGET_STARTUP: &str = "docket_cli::server::startup";

/// Tracing target for server shutdown events.
const TRACING_TARGET_SHUTDOWN: &str = "docket_cli::server::shutdown";

/// Serves the router until the process receives an interrupt.
pub async fn serve(router: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %addr,
        "Server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "Failed to listen for shutdown signal"
        );
        return;
    }

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        "Shutdown signal received, draining connections"
    );
}
