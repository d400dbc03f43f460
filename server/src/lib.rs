//! SAM-Audio separation server.
//!
//! Wires configuration, the model host and the HTTP layer together:
//!
//! 1. resolve [`ServerConfig`] from CLI, environment and TOML
//! 2. select the device and load the model (fatal on failure)
//! 3. serve `/health` and `/separate` until the shutdown future resolves
//! 4. unload the model

pub mod config;
pub mod error;

pub use config::{CliArgs, FileConfig, ServerConfig};
pub use error::{ServerError, ServerResult};

use std::future::Future;
use std::sync::Arc;

use appstate::{ModelLoader, ServerState};
use tokio::net::TcpListener;
use tracing::info;

/// Select the device and load the configured model.
pub fn build_state(config: &ServerConfig, loader: &dyn ModelLoader) -> ServerResult<Arc<ServerState>> {
    info!(model = %config.model, device = ?config.device, "Loading model");
    let state = ServerState::init(config.state_config(), loader)?;
    Ok(Arc::new(state))
}

/// Load the model, bind the configured address and serve until `shutdown`.
pub async fn run<F>(config: ServerConfig, loader: &dyn ModelLoader, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&config, loader)?;

    let addr = config.api_config().bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    run_with_listener(listener, state, shutdown).await
}

/// Serve an already initialized state, then unload the model once the
/// listener has drained.
pub async fn run_with_listener<F>(listener: TcpListener, state: Arc<ServerState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let result = sam_audio_api::serve(listener, state.clone(), shutdown).await;
    state.shutdown();
    info!("Model unloaded");
    result
}
