//! OpenTelemetry trace export.
//!
//! When `OTEL_EXPORTER_OTLP_ENDPOINT` is set, spans are exported over
//! OTLP/gRPC and W3C Trace Context is used for propagation. When it is not
//! set, export is disabled and the services log locally only.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::Registry;

use crate::config::{env_lookup, ConfigError};

/// Trace export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtelConfig {
    /// Collector endpoint (`OTEL_EXPORTER_OTLP_ENDPOINT`). `None` disables export.
    pub otlp_endpoint: Option<String>,
    /// Reported as the `service.name` resource attribute
    /// (`OTEL_SERVICE_NAME`, falling back to the binary's name).
    pub service_name: String,
}

impl OtelConfig {
    /// Loads settings from the process environment.
    pub fn from_env(default_service_name: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup, default_service_name)
    }

    /// Loads settings through `lookup`.
    pub fn from_lookup<F>(lookup: &F, default_service_name: &str) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.is_empty());
        Ok(Self {
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
            service_name: non_empty("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| default_service_name.to_string()),
        })
    }
}

/// Holds the tracer provider so pending spans can be flushed on exit.
pub struct TelemetryGuard {
    tracer_provider: Option<TracerProvider>,
}

impl TelemetryGuard {
    /// Returns `true` if spans are being exported.
    pub fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }

    /// Flushes and shuts down the exporter.
    pub fn shutdown(self) {
        if let Some(provider) = self.tracer_provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to shut down tracer provider");
            }
        }
    }
}

/// Builds the OTLP exporter described by `config`.
///
/// Returns the guard and, when export is enabled, the layer to add to the
/// subscriber stack in [`crate::logging::init_logging`]. An exporter that
/// cannot be built disables export rather than failing startup.
pub fn init_telemetry(
    config: &OtelConfig,
) -> (
    TelemetryGuard,
    Option<OpenTelemetryLayer<Registry, opentelemetry_sdk::trace::Tracer>>,
) {
    let disabled = || {
        (
            TelemetryGuard {
                tracer_provider: None,
            },
            None,
        )
    };

    let Some(endpoint) = &config.otlp_endpoint else {
        return disabled();
    };

    opentelemetry::global::set_text_map_propagator(
        opentelemetry_sdk::propagation::TraceContextPropagator::new(),
    );

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
    {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Failed to create OTLP span exporter, tracing export disabled: {e}");
            return disabled();
        }
    };

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            config.service_name.clone(),
        )]))
        .build();

    let tracer = tracer_provider.tracer(config.service_name.clone());

    (
        TelemetryGuard {
            tracer_provider: Some(tracer_provider),
        },
        Some(OpenTelemetryLayer::new(tracer)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_defaults() {
        let config = OtelConfig::from_lookup(&|_: &str| -> Option<String> { None }, "sink").unwrap();
        assert_eq!(config.otlp_endpoint, None);
        assert_eq!(config.service_name, "sink");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let lookup = |var: &str| match var {
            "OTEL_EXPORTER_OTLP_ENDPOINT" => Some("http://collector:4317".to_string()),
            "OTEL_SERVICE_NAME" => Some("demo-sink".to_string()),
            _ => None,
        };
        let config = OtelConfig::from_lookup(&lookup, "sink").unwrap();
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));
        assert_eq!(config.service_name, "demo-sink");
    }

    #[test]
    fn test_init_telemetry_disabled_without_endpoint() {
        let config = OtelConfig {
            otlp_endpoint: None,
            service_name: "test".to_string(),
        };
        let (guard, layer) = init_telemetry(&config);
        assert!(!guard.is_exporting());
        assert!(layer.is_none());
        guard.shutdown();
    }
}
