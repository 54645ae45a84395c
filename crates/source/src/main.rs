//! Source service entry point.
//!
//! Composition root: wires observability, loads configuration, builds the
//! HTTP event transport, and serves the router until SIGINT/SIGTERM.
//! Configuration errors abort startup before the listener is bound.

use std::sync::Arc;

use anyhow::Context;
use eventing::HttpEventTransport;
use server::logging::init_logging;
use server::{init_telemetry, OtelConfig};
use source::{router, SourceConfig, SourceState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let otel_config = OtelConfig::from_env("source")?;
    let (telemetry, otel_layer) = init_telemetry(&otel_config);
    init_logging("info", otel_layer);

    tracing::info!(
        trace_export = telemetry.is_exporting(),
        "Starting source service"
    );

    let config = SourceConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "Failed to process env"))
        .context("invalid source configuration")?;

    let transport = HttpEventTransport::new(&config.sink)
        .inspect_err(|e| tracing::error!(error = %e, "Could not create a client"))
        .context("could not create event transport")?;

    tracing::info!(sink = %transport.target(), "Sink endpoint configured");

    let listener = server::bind(config.server.port).await?;
    let app = router(SourceState::new(Arc::new(transport)));

    let result = server::serve(
        listener,
        app,
        server::shutdown_signal(),
        config.server.drain_timeout,
    )
    .await;

    tracing::info!("Shutdown complete");
    telemetry.shutdown();
    result.context("source server failed")
}
