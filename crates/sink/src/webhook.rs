//! Chat webhook client.

use envelope::Envelope;
use reqwest::{header, Client, Response, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body posted to the chat webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub text: String,
}

impl From<&Envelope> for WebhookMessage {
    fn from(envelope: &Envelope) -> Self {
        Self {
            text: envelope.display_text(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid webhook url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("could not encode webhook message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not POST chat message: {0}")]
    Request(#[source] reqwest::Error),
}

/// Posts [`WebhookMessage`]s to a single webhook URL.
///
/// No timeout and no retry: a slow webhook holds the calling request open.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: Url,
}

impl WebhookClient {
    /// # Errors
    ///
    /// Returns [`WebhookError::InvalidUrl`] unless `url` is an absolute
    /// `http` or `https` URL.
    pub fn new(url: &str) -> Result<Self, WebhookError> {
        let invalid = |reason: String| WebhookError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        Ok(Self {
            client: Client::new(),
            url: parsed,
        })
    }

    /// Encodes `message` and posts it.
    ///
    /// Returns the webhook's response as soon as its headers arrive; any HTTP
    /// status counts as delivered. The body is left unread for the caller.
    pub async fn send(&self, message: &WebhookMessage) -> Result<Response, WebhookError> {
        let body = serde_json::to_vec(message)?;

        self.client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(WebhookError::Request)
    }
}
