//! HTTP server wiring: routes, shared handles and shutdown.

use crate::songs::handlers::{handle_get_song, handle_root};
use crate::songs::misslog::MissLog;
use crate::songs::protocol::{ENDPOINT_ROOT, ENDPOINT_SONG};
use crate::storage::SongStore;

use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn build_router(store: Arc<dyn SongStore>, miss_log: Arc<MissLog>) -> Router {
    Router::new()
        .route(ENDPOINT_ROOT, get(handle_root))
        .route(ENDPOINT_SONG, get(handle_get_song))
        .layer(Extension(store))
        .layer(Extension(miss_log))
}

/// Serves `app` until Ctrl+C (or SIGTERM on Unix).
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
