mod config;

use std::sync::Arc;

use tracing::{info, warn};

use thoughts_api::state::AppStateInner;
use thoughts_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thoughts=debug,thoughts_api=debug,thoughts_db=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Store lives for exactly as long as the server
    let db = Database::open(&config.db_path)?;
    let state = AppStateInner::new(db, config.auth_secret.clone());
    let app = thoughts_api::router(state.clone());

    let addr = config.addr()?;
    info!("Thoughts server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(state) {
        Ok(inner) => inner.db.close()?,
        Err(_) => warn!("Store still referenced at shutdown, skipping explicit close"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
