//! Recommendation service entry point.
//!
//! Reads configuration from the environment, then serves the
//! recommendation API. Every query fetches the latest snapshot from the
//! upstream source and retrains before answering.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use server::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("upstream snapshot source: {}", config.base_url);
    info!(
        "serving up to {} recommendations per query",
        config.num_recommendations
    );

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("recommendation server listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
