//! Structured JSON logging.
//!
//! Every service writes one JSON object per event to stdout. `RUST_LOG`
//! overrides the default filter directive.

use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Installs the global subscriber: JSON formatting, env filter, and the
/// optional OpenTelemetry layer from [`crate::telemetry::init_telemetry`].
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_logging(
    default_filter: &str,
    otel_layer: Option<OpenTelemetryLayer<Registry, opentelemetry_sdk::trace::Tracer>>,
) {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|e| {
            eprintln!("Invalid log filter '{default_filter}', falling back to 'info': {e}");
            EnvFilter::new("info")
        });

    let fmt_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .flatten_event(true);

    // The OTel layer sits closest to the registry so its type parameter matches.
    tracing_subscriber::registry()
        .with(otel_layer)
        .with(fmt_layer)
        .with(filter_layer)
        .init();
}
