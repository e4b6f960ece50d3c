//! Weekly Schedule Board Backend
//!
//! A REST backend with SQLite persistence resolving sparse assignment
//! records into a fully populated per-weekday schedule grid.

mod api;
mod config;
mod db;
mod errors;
mod grid;
mod models;
mod reconcile;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use grid::GridCache;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub grids: Arc<GridCache>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Schedule Board Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        grids: Arc::new(GridCache::new()),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Professionals
        .route("/professionals", get(api::list_professionals))
        .route("/professionals", post(api::create_professional))
        .route("/professionals/{id}", get(api::get_professional))
        .route("/professionals/{id}", put(api::update_professional))
        .route("/professionals/{id}", delete(api::delete_professional))
        // Activity kinds
        .route("/activity-kinds", get(api::list_activity_kinds))
        .route("/activity-kinds", post(api::create_activity_kind))
        .route("/activity-kinds/{id}", put(api::update_activity_kind))
        .route("/activity-kinds/{id}", delete(api::delete_activity_kind))
        // Time slots
        .route("/time-slots", get(api::list_time_slots))
        .route("/time-slots", post(api::create_time_slot))
        .route("/time-slots/{id}", delete(api::delete_time_slot))
        // Assignments
        .route("/assignments", get(api::list_assignments))
        .route("/assignments", post(api::create_assignment))
        .route("/assignments/batch", post(api::batch_paint_assignments))
        .route("/assignments/{id}", get(api::get_assignment))
        .route("/assignments/{id}", put(api::update_assignment))
        .route("/assignments/{id}", delete(api::delete_assignment))
        // Resolved grid + statistics
        .route("/grid/{weekday}", get(api::get_grid))
        .route("/stats", get(api::get_stats));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
