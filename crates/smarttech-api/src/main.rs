//! SmartTech Manager API
//!
//! REST backend for the repair-shop management frontend

use anyhow::{Context, Result};
use smarttech_api::{create_router, AppState, Config, Storage};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smarttech_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting SmartTech Manager API");
    info!("Redis URL: {}", config.redis_url);

    // Initialize storage
    let storage = Storage::new(&config.redis_url)
        .await
        .context("Failed to initialize storage")?;

    // Create application state and router
    let state = AppState::new(storage);
    let app = create_router(state);

    // Bind and serve
    let addr = config.api_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("SmartTech Manager API running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
