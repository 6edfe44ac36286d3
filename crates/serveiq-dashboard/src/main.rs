//! Serve IQ Dashboard
//!
//! Run with: cargo run -p serveiq-dashboard

use serveiq_common::shutdown::shutdown_signal;
use serveiq_config::Config;
use serveiq_dashboard::{
    server::{build_router, DashboardApp},
    ApiClient, Renderer,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Serve IQ dashboard...");

    let client = ApiClient::new(config.dashboard.api_url.clone());
    info!("Reading inference data from {}", client.url());

    let app = DashboardApp {
        source: Arc::new(client),
        renderer: Renderer::new(config.dashboard.placeholder_image.clone())?,
    };

    let addr = config.dashboard.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Dashboard running on http://{}", addr);

    axum::serve(listener, build_router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard shut down");
    Ok(())
}
