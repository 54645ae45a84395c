//! End-to-end: caller → source → HTTP event transport → sink → chat webhook.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use eventing::HttpEventTransport;
use sink::{SinkState, WebhookClient, SINK_PATH};
use source::{SourceState, EVENT_PATH};
use tokio::sync::oneshot;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the sink service on an ephemeral port. Returns its base URL and a
/// handle that stops it.
async fn start_sink(webhook_url: &str) -> (String, oneshot::Sender<()>) {
    let webhook = WebhookClient::new(webhook_url).unwrap();
    let listener = server::bind(0).await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    tokio::spawn(server::serve(
        listener,
        sink::router(SinkState::new(webhook)),
        async move {
            let _ = stop_rx.await;
        },
        Duration::from_secs(1),
    ));

    (format!("http://127.0.0.1:{port}"), stop_tx)
}

async fn post_to_source(app: axum::Router, body: &'static str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(EVENT_PATH)
                .header(header::USER_AGENT, "curl/7.1")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_hello_reaches_chat_webhook() {
    let chat = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(serde_json::json!({
            "text": "Important message from 'curl/7.1': hello"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&chat)
        .await;

    let (sink_url, stop_sink) = start_sink(&format!("{}/hook", chat.uri())).await;
    let transport = HttpEventTransport::new(&format!("{sink_url}{SINK_PATH}")).unwrap();
    let source = source::router(SourceState::new(Arc::new(transport)));

    let (status, body) = post_to_source(source, "hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let _ = stop_sink.send(());
}

#[tokio::test]
async fn test_source_succeeds_even_when_webhook_rejects() {
    let chat = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&chat)
        .await;

    let (sink_url, stop_sink) = start_sink(&chat.uri()).await;
    let transport = HttpEventTransport::new(&format!("{sink_url}{SINK_PATH}")).unwrap();
    let source = source::router(SourceState::new(Arc::new(transport)));

    let (status, body) = post_to_source(source, "hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let _ = stop_sink.send(());
}

#[tokio::test]
async fn test_source_reports_sink_rejection() {
    let chat = MockServer::start().await;
    let (sink_url, stop_sink) = start_sink(&chat.uri()).await;

    // Point the source at a path the sink does not serve.
    let transport = HttpEventTransport::new(&format!("{sink_url}/wrong")).unwrap();
    let source = source::router(SourceState::new(Arc::new(transport)));

    let (status, body) = post_to_source(source, "hello").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body.starts_with("Failed to send a cloud event: sink responded with status 404"),
        "{body}"
    );
    let _ = stop_sink.send(());
}
