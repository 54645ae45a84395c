//! HTTP surface of the sink service.

use std::fmt::Display;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use envelope::Envelope;
use tracing::Instrument;

use crate::webhook::{WebhookClient, WebhookError, WebhookMessage};

/// Path of the receiving endpoint.
pub const SINK_PATH: &str = "/api/v1/sink";

/// State shared by every request.
#[derive(Debug, Clone)]
pub struct SinkState {
    webhook: WebhookClient,
}

impl SinkState {
    pub fn new(webhook: WebhookClient) -> Self {
        Self { webhook }
    }
}

/// Builds the sink service router.
pub fn router(state: SinkState) -> Router {
    Router::new()
        .route(
            SINK_PATH,
            post(receive_envelope).fallback(server::method_not_allowed),
        )
        .with_state(state)
}

#[tracing::instrument(name = "sink.receive_envelope", skip_all)]
async fn receive_envelope(
    State(state): State<SinkState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    tracing::info!(
        ce_id = ?header_str(&headers, "ce-id"),
        ce_type = ?header_str(&headers, "ce-type"),
        "Serving an event"
    );

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return bad_request(&e),
    };
    let envelope = match Envelope::decode_first(&bytes) {
        Ok(envelope) => envelope,
        Err(e) => return bad_request(&e),
    };

    tracing::info!(origin = %envelope.origin, "Received message from {}", envelope.origin);

    let response = match state.webhook.send(&WebhookMessage::from(&envelope)).await {
        Ok(response) => response,
        Err(WebhookError::Encode(e)) => {
            tracing::error!(error = %e, "Could not encode data to send");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Could not POST chat message");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // The caller is answered now; the webhook's body is only logged.
    tokio::spawn(log_webhook_response(response).in_current_span());

    (StatusCode::OK, "ok").into_response()
}

async fn log_webhook_response(response: reqwest::Response) {
    let status = response.status();
    match response.text().await {
        Ok(body) => tracing::info!(status = status.as_u16(), body = %body, "Webhook response"),
        Err(e) => tracing::warn!(
            status = status.as_u16(),
            error = %e,
            "Could not read response body from webhook POST"
        ),
    }
}

fn bad_request(err: &dyn Display) -> Response {
    tracing::warn!(error = %err, "Could not decode POST data");
    (
        StatusCode::BAD_REQUEST,
        format!("Could not decode POST data: {err}\n"),
    )
        .into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
