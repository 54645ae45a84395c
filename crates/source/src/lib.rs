//! Source service.
//!
//! Exposes `POST /api/v1/event`. Each request body is wrapped, byte for byte,
//! in an [`envelope::Envelope`] whose origin is the caller's `User-Agent`, and
//! the envelope is forwarded to the sink as an [`envelope::Event`] through an
//! [`envelope::EventTransport`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `SourceConfig` loaded from `SINK`, `PORT`, `SHUTDOWN_TIMEOUT_SECS` |
//! | [`routes`] | Router, shared state, and the event handler |

pub mod config;
pub mod routes;

pub use config::SourceConfig;
pub use routes::{router, SourceState, EVENT_PATH, EVENT_SOURCE, EVENT_TYPE};
