//! Serve IQ Query Service
//!
//! Run with: cargo run -p serveiq-web

use serveiq_common::shutdown::shutdown_signal;
use serveiq_config::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Serve IQ query service...");

    let state = serveiq_web::state::AppState::connect(&config.database).await;
    let app = serveiq_web::router::build_router(state);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
