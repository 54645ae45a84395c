//! Error type for event delivery.
//!
//! [`TransportError`] is returned by every [`crate::EventTransport`]
//! implementation. None of the variants are retried: the caller reports the
//! failure for the request that triggered the send and moves on.

use thiserror::Error;

/// Failure to hand an [`crate::Event`] to the downstream sink.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport target is not a usable URL.
    ///
    /// Produced at construction time, before any event is sent.
    #[error("invalid transport target '{target}': {reason}")]
    InvalidTarget {
        /// The configured target as given.
        target: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The envelope could not be serialised.
    #[error("failed to encode event payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The request never produced a response (connection refused, DNS, reset).
    #[error("failed to deliver event: {message}")]
    Request {
        /// Underlying client error text.
        message: String,
    },

    /// The sink answered with a non-success status.
    #[error("sink responded with status {status}: {body}")]
    Status {
        /// HTTP status code returned by the sink.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
}
