//! Sink service entry point.
//!
//! Composition root: wires observability, loads configuration, builds the
//! webhook client, and serves the router until SIGINT/SIGTERM.
//! Configuration errors abort startup before the listener is bound.

use anyhow::Context;
use server::logging::init_logging;
use server::{init_telemetry, OtelConfig};
use sink::{router, SinkConfig, SinkState, WebhookClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let otel_config = OtelConfig::from_env("sink")?;
    let (telemetry, otel_layer) = init_telemetry(&otel_config);
    init_logging("info", otel_layer);

    tracing::info!(
        trace_export = telemetry.is_exporting(),
        "Starting sink service"
    );

    let config = SinkConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "Failed to process env"))
        .context("invalid sink configuration")?;

    let webhook = WebhookClient::new(&config.webhook_url)
        .inspect_err(|e| tracing::error!(error = %e, "Invalid webhook url"))
        .context("could not create webhook client")?;

    let listener = server::bind(config.server.port).await?;
    let app = router(SinkState::new(webhook));

    let result = server::serve(
        listener,
        app,
        server::shutdown_signal(),
        config.server.drain_timeout,
    )
    .await;

    tracing::info!("Shutdown complete");
    telemetry.shutdown();
    result.context("sink server failed")
}
