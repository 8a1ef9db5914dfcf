//! HeritageVault API server binary.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use heritagevault_server::config::Config;
use heritagevault_server::pinning::{PinataClient, PinningClient};
use heritagevault_server::storage::{MemStorage, PgStorage, Storage};
use heritagevault_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let storage: Arc<dyn Storage> = match &config.database_url {
        Some(url) => {
            let pg = PgStorage::connect(url)
                .await
                .context("failed to connect to PostgreSQL")?;
            tracing::info!("storage backend: PostgreSQL");
            Arc::new(pg)
        }
        None => {
            tracing::info!("storage backend: in-memory (DATABASE_URL not set)");
            Arc::new(MemStorage::new())
        }
    };

    let pinning: Option<Arc<dyn PinningClient>> = match config.pinata.clone() {
        Some(pinata) => {
            tracing::info!("upload relay: Pinata");
            Some(Arc::new(PinataClient::new(pinata)?))
        }
        None => {
            tracing::warn!("upload relay disabled (PINATA_API_KEY/PINATA_API_SECRET not set)");
            None
        }
    };

    tokio::fs::create_dir_all(&config.uploads_dir)
        .await
        .with_context(|| format!("failed to create uploads dir {:?}", config.uploads_dir))?;

    let app = create_router(AppState {
        storage,
        pinning,
        uploads_dir: config.uploads_dir.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("serving on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
