//! # Atelier API
//!
//! The web surface of the workshop reservation system: calendar reads for
//! the presentation layer, reservation intake for clients, and request
//! triage for operators.
//!
//! ## Architecture
//!
//! - **Routes**: define the endpoints and URL structure
//! - **Handlers**: implement request processing logic
//! - **Middleware**: error mapping shared by every endpoint
//! - **Config**: environment-driven server and workshop configuration
//!
//! The API uses Axum as the web framework; everything it serves comes from
//! the `atelier-store` entity stores over per-entity JSON documents.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Error-mapping middleware
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use atelier_store::{ClientRegistry, FileStore, RequestStore, WeekStore};

/// Shared application state accessible to all request handlers.
pub struct ApiState {
    pub weeks: WeekStore,
    pub clients: ClientRegistry,
    pub requests: RequestStore,
    pub config: config::ApiConfig,
}

/// Builds the application state over file stores rooted at the configured
/// data directory (`weeks/`, `clients/` and `requests/` subdirectories).
pub async fn build_state(config: config::ApiConfig) -> Result<Arc<ApiState>> {
    let weeks = Arc::new(FileStore::new(config.data_dir.join("weeks")).await?);
    let clients = Arc::new(FileStore::new(config.data_dir.join("clients")).await?);
    let requests = Arc::new(FileStore::new(config.data_dir.join("requests")).await?);

    Ok(Arc::new(ApiState {
        weeks: WeekStore::new(weeks, config.week_template()),
        clients: ClientRegistry::new(clients, config.client_namespace()),
        requests: RequestStore::new(requests, config.request_namespace()),
        config,
    }))
}

/// The full application router. Exposed separately from [`start_server`] so
/// tests can drive it without binding a socket.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Calendar read endpoints
        .merge(routes::calendar::routes())
        // Reservation intake endpoints
        .merge(routes::reservations::routes())
        // Request triage endpoints
        .merge(routes::requests::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server: sets up logging, builds the router, applies CORS
/// and timeout layers, and serves until shutdown.
pub async fn start_server(state: Arc<ApiState>) -> Result<()> {
    let log_level: Level = state.config.log_level;
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = router(Arc::clone(&state));

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &state.config.cors_origins {
        let origins = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect::<Vec<_>>();
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins);
        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(state.config.request_timeout),
    ));

    let addr = state.config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
