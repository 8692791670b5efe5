//! # SiteCanvas Server
//!
//! Project, code generation and deployment gateway for the SiteCanvas
//! editor. Binds to localhost only.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sitecanvas_core::ProjectStore;
use sitecanvas_server::{build_router, metrics, AppState, Config, Gateway};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,sitecanvas_server=debug,tower_http=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,sitecanvas_server=debug,sitecanvas_core=debug,tower_http=debug")
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Open the project store, loading persisted projects when a data directory
/// is configured.
fn open_store(config: &Config) -> anyhow::Result<ProjectStore> {
    let Some(dir) = &config.data_dir else {
        tracing::info!("No data directory configured; projects are kept in memory");
        return Ok(ProjectStore::new());
    };
    let store = ProjectStore::with_data_dir(dir)
        .map_err(|e| anyhow::anyhow!("Failed to open data directory {}: {e}", dir.display()))?;
    store.load_all()?;
    tracing::info!("Persisting projects to {}", dir.display());
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing();

    let metrics_handle = metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to initialize Prometheus metrics: {e}"))?;
    tracing::info!("Prometheus metrics initialized");

    let store = open_store(&config)?;
    metrics::set_projects_total(store.len());
    let provider = config.hosting_provider()?;
    tracing::info!(provider = provider.name(), "Hosting provider configured");

    let state = AppState::new(Gateway::new(store, provider), metrics_handle);
    let app = build_router(state, config.port);

    // Bind to localhost ONLY
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("SiteCanvas gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
