//! Sink service.
//!
//! Exposes `POST /api/v1/sink`. Each request body is decoded as an
//! [`envelope::Envelope`], formatted as
//! `Important message from '<origin>': <data>`, and relayed to a chat
//! webhook as `{"text": "..."}`. The caller gets `200 ok` as soon as the
//! webhook accepts the request; the webhook's response body is only logged.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `SinkConfig` loaded from `GCHAT_WEBHOOK_URL`, `PORT`, `SHUTDOWN_TIMEOUT_SECS` |
//! | [`webhook`] | Chat webhook client and message type |
//! | [`routes`] | Router, shared state, and the sink handler |

pub mod config;
pub mod routes;
pub mod webhook;

pub use config::SinkConfig;
pub use routes::{router, SinkState, SINK_PATH};
pub use webhook::{WebhookClient, WebhookError, WebhookMessage};
