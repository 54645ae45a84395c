//! HTTP surface of the source service.

use std::fmt::Display;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use envelope::{Envelope, Event, EventTransport, EventType, SourceUri};

/// Path of the ingestion endpoint.
pub const EVENT_PATH: &str = "/api/v1/event";

/// Type stamped on every emitted event.
pub const EVENT_TYPE: &str = "dev.knative.eventing.containersource-demo.message";

/// Source URI stamped on every emitted event.
pub const EVENT_SOURCE: &str = "https://github.com/containersource-demo/source";

/// State shared by every request.
#[derive(Clone)]
pub struct SourceState {
    transport: Arc<dyn EventTransport>,
    event_type: EventType,
    source: SourceUri,
}

impl SourceState {
    /// Creates state that emits events through `transport` with the fixed
    /// [`EVENT_TYPE`] and [`EVENT_SOURCE`].
    pub fn new(transport: Arc<dyn EventTransport>) -> Self {
        Self {
            transport,
            event_type: EventType::from_static(EVENT_TYPE),
            source: SourceUri::from_static(EVENT_SOURCE),
        }
    }
}

/// Builds the source service router.
pub fn router(state: SourceState) -> Router {
    Router::new()
        .route(
            EVENT_PATH,
            post(receive_event).fallback(server::method_not_allowed),
        )
        .with_state(state)
}

/// Wraps the request body in an envelope and forwards it to the sink.
///
/// The body is read in full with no size limit.
#[tracing::instrument(name = "source.receive_event", skip_all)]
async fn receive_event(
    State(state): State<SourceState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let data = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => return fail("Failed to read POST data", &e),
    };

    let origin = headers
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    let event = Event::new(
        state.event_type.clone(),
        state.source.clone(),
        Envelope::new(origin, data),
    );

    tracing::info!(
        event_id = %event.id,
        origin = %event.data.origin,
        bytes = event.data.data.len(),
        "Sending a cloud event with {} bytes of data",
        event.data.data.len()
    );

    if let Err(e) = state.transport.send(&event).await {
        return fail("Failed to send a cloud event", &e);
    }

    (StatusCode::OK, "ok").into_response()
}

/// Logs `err` and answers 500 with `"<msg>: <err>\n"`.
fn fail(msg: &str, err: &dyn Display) -> Response {
    tracing::error!(error = %err, "{msg}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{msg}: {err}\n"),
    )
        .into_response()
}
