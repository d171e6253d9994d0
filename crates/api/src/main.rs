//! API server entry point.

use api::Config;
use tokio::signal;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Load configuration (a local .env may supply DATABASE_URL) and initialize tracing
    let config = Config::load();
    api::init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = match metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
    {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "failed to install Prometheus recorder");
            std::process::exit(1);
        }
    };
    api::routes::metrics::describe();

    // 3. Connect to the document store; refuse to serve without it
    let store = match api::connect_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to document store");
            std::process::exit(1);
        }
    };
    tracing::info!(database = ?config.database_name, "connected to document store");

    // 4. Build the application
    let state = api::create_default_state(store);
    let app = api::create_app(state, metrics_handle, &config.images_dir);

    // 5. Start server
    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind address");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, images = %config.images_dir.display(), "starting API server");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }

    tracing::info!("server shut down gracefully");
}
