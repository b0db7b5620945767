use anyhow::{Context, Result};
use smart_office::api::create_app;
use smart_office::config::{load_config, OfficeConfig};
use smart_office::service::{run_simulation, OfficeService, StdRandom};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smart_office=info".into()),
        )
        .init();

    info!("Smart Office starting...");

    let config = match std::env::var("SMART_OFFICE_CONFIG") {
        Ok(path) => load_config(&path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Failed to load config from {}", path))?,
        Err(_) => OfficeConfig::default(),
    }
    .apply_env();

    info!(
        host = %config.server.host,
        port = config.server.port,
        simulation = config.simulation.enabled,
        "Configuration loaded"
    );

    let office = Arc::new(OfficeService::with_event_capacity(
        config.events.channel_capacity,
    ));

    let simulation_handle = if config.simulation.enabled {
        Some(tokio::spawn(run_simulation(
            Arc::clone(&office),
            config.simulation.interval_seconds,
            StdRandom::from_entropy(),
        )))
    } else {
        None
    };

    let addr = config
        .server
        .bind_addr()
        .context("Invalid server host/port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind HTTP port")?;
    info!(address = %addr, "Smart Office API listening");

    let router = create_app(office);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "HTTP server error");
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    server_handle.abort();
    if let Some(handle) = simulation_handle {
        handle.abort();
    }
    info!("Smart Office stopped");

    Ok(())
}
