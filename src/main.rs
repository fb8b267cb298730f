//! Bookmark Backend server entry point.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bookmark_backend::config::{Config, LogFormat};
use bookmark_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }

    tracing::info!("Starting Bookmark Backend");
    tracing::info!("Collection source: {}", config.source_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    let state = AppState::new(&config)?;

    if config.load_on_start {
        match state.refresh().await {
            Ok(snapshot) => tracing::info!(
                "Collection loaded with {} records",
                snapshot.collection.len()
            ),
            Err(e) => tracing::warn!(
                "Initial load from {} failed, serving empty collection: {}",
                state.loader.endpoint(),
                e
            ),
        }
    }

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
