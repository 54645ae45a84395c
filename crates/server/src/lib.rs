//! HTTP server infrastructure shared by the source and sink services.
//!
//! Both services have the same lifecycle: read configuration from the
//! environment, install logging, bind a single listener, serve until SIGINT or
//! SIGTERM, then drain in-flight requests for a bounded time. This crate owns
//! that lifecycle so each service only supplies its router.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `ServerConfig`, `ConfigError`, environment lookup helpers |
//! | [`serve`] | `bind`, `serve` with drain deadline, `shutdown_signal` |
//! | [`handlers`] | Handlers shared by both routers (405 fallback) |
//! | [`telemetry`] | OpenTelemetry OTLP export setup |
//! | [`logging`] | `tracing-subscriber` JSON logging setup |

pub mod config;
pub mod handlers;
pub mod logging;
pub mod serve;
pub mod telemetry;

pub use config::{ConfigError, ServerConfig};
pub use handlers::method_not_allowed;
pub use serve::{bind, serve, shutdown_signal, ServerError};
pub use telemetry::{init_telemetry, OtelConfig, TelemetryGuard};
