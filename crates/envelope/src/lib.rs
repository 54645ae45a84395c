//! Shared message schema for the source → sink pipeline.
//!
//! This crate contains the wire contract between the two services and the
//! port trait the source service uses to emit events. Infrastructure crates
//! implement the traits defined here; they never change the schema.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//! It defines *what* travels between the services; the `eventing` crate
//! defines *how* it travels.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers for event metadata (`EventType`, `SourceUri`) |
//! | [`types`] | The [`Envelope`] payload and the [`Event`] that carries it |
//! | [`errors`] | Transport error type |
//! | [`transport`] | The [`EventTransport`] port trait |

pub mod errors;
pub mod identifiers;
pub mod transport;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::TransportError;
pub use identifiers::{EventType, SourceUri};
pub use transport::EventTransport;
pub use types::{Envelope, Event};
