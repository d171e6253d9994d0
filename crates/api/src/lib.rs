//! HTTP API for the ClassCart lesson catalog and orders.
//!
//! Provides REST endpoints over the document store, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use document_store::DocumentStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError, LogFormat};
pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
    images_dir: impl AsRef<Path>,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/", get(routes::index::describe))
        .route("/health", get(routes::health::check::<S>))
        .route("/lessons", get(routes::lessons::list::<S>))
        .route("/lessons/search", get(routes::lessons::search::<S>))
        .route(
            "/lessons/{id}",
            get(routes::lessons::get::<S>).put(routes::lessons::update::<S>),
        )
        .route(
            "/orders",
            post(routes::orders::create::<S>).get(routes::orders::list::<S>),
        )
        .route("/orders/checkout", post(routes::orders::checkout::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .with_state(state)
        .nest_service("/images", routes::images::service(images_dir))
        .merge(metrics_router)
        .fallback(routes::not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state on top of a store handle.
pub fn create_default_state<S: DocumentStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}

/// Installs the global tracing subscriber described by `config`.
///
/// `RUST_LOG` in the environment wins over the configured level.
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Connects to the configured PostgreSQL store and applies migrations.
pub async fn connect_store(
    config: &Config,
) -> Result<document_store::PostgresDocumentStore, Box<dyn std::error::Error>> {
    let url = config.database_url()?;
    let store = document_store::PostgresDocumentStore::connect(
        url,
        config.database_name.as_deref(),
        config.db_max_connections,
    )
    .await?;
    store.run_migrations().await?;
    Ok(store)
}
