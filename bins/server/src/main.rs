//! Tresor API Server
//!
//! Main entry point for the report generation service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tresor_api::{AppState, create_router};
use tresor_core::storage::ArtifactStore;
use tresor_db::connect;
use tresor_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tresor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create artifact store
    let artifacts = ArtifactStore::from_config(&config.artifacts)
        .map_err(|e| anyhow::anyhow!("artifact store: {e}"))?;
    info!(
        provider = %config.artifacts.provider,
        root = %config.artifacts.root,
        "Artifact store configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        artifacts: Arc::new(artifacts),
        engine: config.engine.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
