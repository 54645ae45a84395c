//! Handlers shared by both services' routers.

use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;

/// Fallback for POST-only routes: logs the offending method and answers 405
/// with an `Allow: POST` header.
pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    tracing::warn!(%method, "Request has method {method} but expected POST");
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "POST")])
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_non_post_gets_405_with_allow_header() {
        let app = Router::new().route(
            "/api",
            post(|| async { "ok" }).fallback(method_not_allowed),
        );

        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/api")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
        }
    }
}
