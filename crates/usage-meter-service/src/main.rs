//! Usage Meter Service - HTTP API for message credit usage.
//!
//! This is the main entry point for the usage-meter service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use usage_meter_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "info,usage_meter_service=debug,usage_meter_client=debug".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Usage Meter Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        upstream = %config.upstream_base_url,
        "Service configuration loaded"
    );

    // Build app state (constructs the upstream client)
    let state = AppState::new(config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
