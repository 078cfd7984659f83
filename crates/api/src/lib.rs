//! HTTP API layer with Axum routes and extractors.
//!
//! This crate is a thin adapter over the report engine: it parses and
//! validates requests, drives the planner/renderer/store, and shapes
//! responses. No business logic lives here.

pub mod extractors;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tresor_core::storage::ArtifactStore;
use tresor_shared::config::EngineConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Artifact blob store.
    pub artifacts: Arc<ArtifactStore>,
    /// Report engine tuning.
    pub engine: EngineConfig,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/etats", routes::etats::routes())
        .merge(routes::health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
