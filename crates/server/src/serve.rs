//! Listener lifecycle: bind, serve, and drain on shutdown.

use std::future::{Future, IntoFuture};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;

/// Failure of the HTTP listener.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    /// In-flight requests were still running when the drain deadline passed.
    /// They are abandoned.
    #[error("in-flight requests did not finish within {0:?}")]
    DrainTimeout(Duration),
}

/// Binds a listener on all interfaces at `port`. Port `0` picks a free port.
pub async fn bind(port: u16) -> Result<TcpListener, ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { port, source })
}

/// Serves `router` on `listener` until `shutdown` resolves.
///
/// Once `shutdown` resolves the listener stops accepting connections and
/// in-flight requests get at most `drain_timeout` to complete.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Serving");
    }

    let (draining_tx, mut draining_rx) = watch::channel(false);
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = draining_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.map_err(ServerError::Serve),
        _ = draining_rx.changed() => {}
    }

    tracing::info!(
        drain_timeout_secs = drain_timeout.as_secs_f64(),
        "Draining in-flight requests"
    );

    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(result) => {
            tracing::info!("Server stopped");
            result.map_err(ServerError::Serve)
        }
        Err(_) => {
            tracing::warn!(
                drain_timeout_secs = drain_timeout.as_secs_f64(),
                "Drain deadline elapsed with requests still in flight"
            );
            Err(ServerError::DrainTimeout(drain_timeout))
        }
    }
}

/// Resolves when the process receives SIGINT (Ctrl+C) or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            // Keep waiting for SIGTERM instead.
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::routing::get;
    use tokio::sync::{oneshot, Notify};

    use super::*;

    #[tokio::test]
    async fn test_serve_stops_after_shutdown() {
        let listener = bind(0).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route("/", get(|| async { "hi" }));

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(
            listener,
            router,
            async move {
                let _ = rx.await;
            },
            Duration::from_secs(5),
        ));

        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "hi");

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_serve_gives_up_after_drain_deadline() {
        let listener = bind(0).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let entered = Arc::new(Notify::new());
        let handler_entered = entered.clone();
        let router = Router::new().route(
            "/slow",
            get(move || {
                let entered = handler_entered.clone();
                async move {
                    entered.notify_one();
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    "late"
                }
            }),
        );

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(
            listener,
            router,
            async move {
                let _ = rx.await;
            },
            Duration::from_millis(100),
        ));

        tokio::spawn(reqwest::get(format!("http://{addr}/slow")));
        entered.notified().await;
        tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ServerError::DrainTimeout(_))));
    }

    #[tokio::test]
    async fn test_bind_reports_port_in_use() {
        let first = bind(0).await.unwrap();
        let port = first.local_addr().unwrap().port();

        let err = bind(port).await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { port: p, .. } if p == port));
    }
}
