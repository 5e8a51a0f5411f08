use std::sync::Arc;

use anyhow::Context;
use api_gateway::config::Config;
use api_gateway::inbound::http::router::create_router;
use api_gateway::outbound::identity_provider::HttpIdentityProvider;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "api-gateway",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load().context("Failed to load configuration")?;

    tracing::info!(
        http_port = config.server.port,
        auth_service_url = %config.auth_service.url,
        auth_service_timeout_secs = config.auth_service.timeout_secs,
        "Configuration loaded"
    );

    let identity_provider = Arc::new(
        HttpIdentityProvider::new(&config.auth_service.url, config.auth_service.timeout())
            .context("Failed to build auth service client")?,
    );

    let http_address = format!("0.0.0.0:{}", config.server.port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(identity_provider)).await?;

    tracing::info!("Server exited");

    Ok(())
}
