//! HTTP event transport.
//!
//! Implements the [`envelope::EventTransport`] trait by POSTing each event to
//! the configured sink URL in CloudEvents *binary content mode*: the event
//! metadata travels in `ce-*` headers and the body is the JSON-encoded
//! [`envelope::Envelope`] on its own. A sink can therefore decode the body
//! directly as an envelope without knowing anything about the event format.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Header mapping, serialisation, and status handling all
//! live here. The source service sees only [`envelope::EventTransport`].
//!
//! Requests carry no timeout and are never retried; a failed send is reported
//! to the caller exactly once.

use async_trait::async_trait;
use envelope::{Event, EventTransport, TransportError};
use reqwest::{header, Client, Url};

/// CloudEvents specification version advertised in `ce-specversion`.
pub const SPEC_VERSION: &str = "0.2";

/// Header names for binary content mode.
pub mod headers {
    pub const SPEC_VERSION: &str = "ce-specversion";
    pub const ID: &str = "ce-id";
    pub const TYPE: &str = "ce-type";
    pub const SOURCE: &str = "ce-source";
    pub const TIME: &str = "ce-time";
}

/// [`EventTransport`] that delivers events to a single HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpEventTransport {
    client: Client,
    target: Url,
}

impl HttpEventTransport {
    /// Creates a transport that sends every event to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidTarget`] if `target` is not an
    /// absolute `http` or `https` URL.
    pub fn new(target: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), target)
    }

    /// Creates a transport using a caller-supplied [`reqwest::Client`].
    pub fn with_client(client: Client, target: &str) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidTarget {
            target: target.to_string(),
            reason,
        };

        let url = Url::parse(target).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        Ok(Self {
            client,
            target: url,
        })
    }

    /// Returns the URL events are delivered to.
    pub fn target(&self) -> &Url {
        &self.target
    }
}

#[async_trait]
impl EventTransport for HttpEventTransport {
    async fn send(&self, event: &Event) -> Result<(), TransportError> {
        let body = serde_json::to_vec(&event.data)?;

        tracing::debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            target = %self.target,
            bytes = body.len(),
            "Sending event"
        );

        let response = self
            .client
            .post(self.target.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(headers::SPEC_VERSION, SPEC_VERSION)
            .header(headers::ID, event.id.as_str())
            .header(headers::TYPE, event.event_type.as_str())
            .header(headers::SOURCE, event.source.as_str())
            .header(headers::TIME, event.time.to_rfc3339())
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    event_id = %event.id,
                    error = %e,
                    "Could not read response body from sink"
                );
                String::new()
            }
        };
        tracing::warn!(
            event_id = %event.id,
            status = status.as_u16(),
            "Sink rejected event"
        );
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
