//! Stitch Catalog - read-through cache over a cross-stitch pattern catalog
//!
//! Serves the cached catalog over a JSON API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stitch_catalog::api::create_router;
use stitch_catalog::store::{CatalogStore, JsonFileStore, MemoryStore};
use stitch_catalog::{spawn_refresh_task, AppState, Config};

/// Main entry point for the catalog server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Pick the backing store (JSON export or empty in-memory store)
/// 4. Optionally warm the cache before serving
/// 5. Optionally start the background refresh task
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stitch_catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stitch Catalog server");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, default_page_size={}, max_page_size={}, refresh_interval={}s",
        config.server_port, config.default_page_size, config.max_page_size, config.refresh_interval
    );

    let store: Arc<dyn CatalogStore> = match &config.seed_path {
        Some(path) => {
            info!(path = %path.display(), "Using JSON catalog export");
            Arc::new(JsonFileStore::new(path, config.scan_page_limit))
        }
        None => {
            warn!("CATALOG_SEED_PATH not set; serving an empty catalog");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::from_config(&config, store);

    // A failed warm-up is not fatal: the first request retries.
    if config.warm_on_start {
        match state.catalog.ensure_populated().await {
            Ok(()) => info!("Catalog cache warmed"),
            Err(err) => error!(error = %err, "Catalog warm-up failed; will retry on first request"),
        }
    }

    let refresh_handle = (config.refresh_interval > 0)
        .then(|| spawn_refresh_task(state.catalog.clone(), config.refresh_interval));
    if refresh_handle.is_some() {
        info!("Background refresh task started");
    }

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(refresh_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the refresh task and allows graceful shutdown.
async fn shutdown_signal(refresh_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = refresh_handle {
        handle.abort();
        warn!("Refresh task aborted");
    }
}
