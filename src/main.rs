// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use experiment_telemetry::infrastructure::config::load_dashboard_config;
use experiment_telemetry::infrastructure::file_view_repository::FileViewRepository;
use experiment_telemetry::infrastructure::postgrest_repository::PostgrestRepository;
use experiment_telemetry::presentation::router::{build_router, build_state};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create repositories (infrastructure layer)
    let repository = Arc::new(PostgrestRepository::new(config.postgrest.clone())?);
    let views = Arc::new(FileViewRepository::new(config.storage.view_dir.clone()));

    // Create services and router (application + presentation layers)
    let state = build_state(repository, views, config.chart.default_smoothing);
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting experiment-telemetry service on {} (store {})",
        addr,
        config.postgrest.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
