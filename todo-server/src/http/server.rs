//! Axum server setup
//!
//! Lifecycle: init the store, bind, serve until a termination signal,
//! then tear the store down. In-flight requests are not drained.

use std::future::{Future, IntoFuture};
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::ServerConfig;
use crate::error::StoreError;
use crate::persistence::TodoStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

/// Build the router: item routes, static files for anything else.
pub fn build_router(store: Arc<dyn TodoStore>, static_dir: &Path) -> Router {
    let state = Arc::new(AppState { store });

    Router::new()
        .merge(routes::items::router())
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until SIGINT, SIGTERM or SIGUSR2.
///
/// # Example
///
/// ```ignore
/// let store = select_store(&db_config);
/// run_server(store, ServerConfig::default()).await?;
/// ```
pub async fn run_server(store: Arc<dyn TodoStore>, config: ServerConfig) -> Result<(), ServerError> {
    serve_until(store, config, shutdown_signal()).await
}

/// Run the HTTP server until `shutdown` resolves.
///
/// A store `init` failure is returned before anything is bound.
/// Teardown errors are logged and ignored.
pub async fn serve_until<F>(
    store: Arc<dyn TodoStore>,
    config: ServerConfig,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    store.init().await?;

    let app = build_router(store.clone(), &config.static_dir);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let result = tokio::select! {
        result = axum::serve(listener, app).into_future() => result,
        () = shutdown => Ok(()),
    };

    if let Err(err) = store.teardown().await {
        tracing::warn!(error = %err, "store teardown failed");
    }

    result?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a termination signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = unix_signal(tokio::signal::unix::SignalKind::terminate());

    #[cfg(unix)]
    let restart = unix_signal(tokio::signal::unix::SignalKind::user_defined2());

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    #[cfg(not(unix))]
    let restart = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
        _ = restart => {
            tracing::info!("Received SIGUSR2, starting shutdown");
        }
    }
}

#[cfg(unix)]
async fn unix_signal(kind: tokio::signal::unix::SignalKind) {
    match tokio::signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::DatabaseConfig;
    use crate::persistence::memory::MemoryStore;
    use crate::persistence::{NullStore, PostgresStore};

    fn local_config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn serves_static_files_for_unmatched_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>todo</h1>").unwrap();
        let app = build_router(Arc::new(NullStore), dir.path());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>todo</h1>");

        let response = app
            .oneshot(Request::builder().uri("/missing.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn item_routes_take_precedence_over_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("items"), "static").unwrap();
        let app = build_router(Arc::new(MemoryStore::default()), dir.path());

        let response = app
            .oneshot(Request::builder().uri("/items").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn shutdown_tears_down_store() {
        let store = Arc::new(MemoryStore::default());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(serve_until(store.clone(), local_config(), async {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert!(store.torn_down());
    }

    #[tokio::test]
    async fn teardown_error_does_not_fail_shutdown() {
        let store = Arc::new(MemoryStore::failing_teardown());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(serve_until(store.clone(), local_config(), async {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        assert!(server.await.unwrap().is_ok());
        assert!(store.torn_down());
    }

    #[tokio::test]
    async fn init_failure_aborts_before_binding() {
        let config = DatabaseConfig {
            host: Some("127.0.0.1".into()),
            port: Some(1),
            ..Default::default()
        };
        let store = Arc::new(PostgresStore::new(&config));

        let err = serve_until(store, local_config(), std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Store(StoreError::Connection(_))));
    }
}
