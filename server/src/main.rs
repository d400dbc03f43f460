//! SAM-Audio Server - single-flight audio separation over HTTP.

use anyhow::{Context, Result};
use appstate::BuiltinLoader;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sam_audio_server::{CliArgs, ServerConfig};

const DEFAULT_LOG_FILTER: &str = "sam_audio_server=info,sam_audio_api=info,appstate=info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // `--log-level` and RUST_LOG share one slot; a bad filter falls back to the default
    let filter = args
        .log_level
        .as_deref()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SAM-Audio Server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::load(&args).context("Failed to load configuration")?;
    info!("Config: model={}, device={:?}, bind={}:{}", config.model, config.device, config.host, config.port);

    sam_audio_server::run(config, &BuiltinLoader, shutdown_signal())
        .await
        .context("Server failed")?;

    info!("SAM-Audio Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining requests"),
        Err(e) => {
            warn!("Unable to listen for Ctrl+C ({}), running until killed", e);
            std::future::pending::<()>().await;
        }
    }
}
