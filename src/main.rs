use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendor_api::config::Config;
use vendor_api::db::MongoStore;
use vendor_api::handlers::AppState;
use vendor_api::routes::build_router;

/// Main entry point for the application.
///
/// Initializes logging, loads configuration and connects to MongoDB before
/// binding the listener. Any startup failure is returned as an error, so the
/// process exits without ever accepting requests.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendor_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Connect and verify reachability
    let store = MongoStore::connect(&config).await?;
    tracing::info!(
        "Connected to MongoDB, writing to {}.{}",
        config.db_name,
        config.collection_name
    );

    let app_state = Arc::new(AppState::new(Arc::new(store), config.clone()));
    let app = build_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
