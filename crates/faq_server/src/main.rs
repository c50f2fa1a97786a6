use anyhow::Context;
use clap::Parser;
use faq_server::{config::ServerConfig, serve_with_shutdown, shutdown_signal, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::parse();
    config.validate().map_err(anyhow::Error::msg)?;

    info!("Initializing state...");
    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("bind {}", config.bind))?;

    serve_with_shutdown(listener, state, shutdown_signal()).await?;
    info!("Server shut down");

    Ok(())
}
