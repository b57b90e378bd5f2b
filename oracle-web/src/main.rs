//! oracle-web service entry point.

use anyhow::Result;
use oracle_client::{ClientConfig, OracleClient};
use oracle_common::config::Config;
use oracle_common::logging::init_logging_with_exclusions;
use oracle_common::Validate;
use oracle_web::{build_router, AppState};
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = Config::load_with_env(None)?;
    config.validate().map_err(oracle_common::Error::from)?;
    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    tracing::info!("Oracle Web v{}", env!("CARGO_PKG_VERSION"));

    let client = OracleClient::with_config(ClientConfig::from(&config))?;
    tracing::info!(endpoint = client.endpoint(), "Analysis service");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(AppState::new(client)).layer(cors);

    let addr = format!("{}:{}", config.network.bind, config.network.port);

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down"),
            _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT, shutting down"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down");
    }
}
