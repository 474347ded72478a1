use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use track_meta_api::config::Config;
use track_meta_api::server::{build_router, serve};
use track_meta_api::songs::misslog::MissLog;
use track_meta_api::storage::mongo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();

    // 1. Storage (fail fast):
    let store = mongo::connect(&config)
        .await
        .context("Error connecting to MongoDB")?;

    if let Err(e) = store.ensure_indexes().await {
        tracing::warn!("Could not create song lookup index: {}", e);
    }

    // 2. Miss log:
    let miss_log = Arc::new(MissLog::new(config.missing_log.clone()));
    tracing::info!("Logging missing songs to {}", miss_log.path().display());

    // 3. HTTP Router:
    let app = build_router(Arc::new(store), miss_log);

    // 4. Start HTTP server:
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server is running on http://{}", addr);
    tracing::info!("Press Ctrl+C to shutdown");

    serve(listener, app).await?;

    Ok(())
}
