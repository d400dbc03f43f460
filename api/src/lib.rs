//! SAM-Audio API Crate
//!
//! HTTP layer for the separation server, built on Axum.
//!
//! # Endpoints
//!
//! - `GET /health` → `200 {status, model, device, cuda, busy}`
//! - `POST /separate` → `200 {target_path, residual_path, sample_rate}`,
//!   `400` when `audio_path` does not exist, `503` when the model is not loaded
//!   or a separation is already running, `500` when processing fails
//! - `GET /api-doc/openapi.json` → OpenAPI document
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sam_audio_api::{run_server, ApiConfig, AppStateProvider};
//! use sam_audio_values::{BackendError, BackendResult, HealthResponse, SeparateRequest, SeparateResponse};
//!
//! struct NoModel;
//!
//! impl AppStateProvider for NoModel {
//!     fn health(&self) -> HealthResponse {
//!         HealthResponse {
//!             status: "ok".into(),
//!             model: None,
//!             device: "cpu".into(),
//!             cuda: false,
//!             busy: false,
//!         }
//!     }
//!
//!     fn separate(&self, _req: &SeparateRequest) -> BackendResult<SeparateResponse> {
//!         Err(BackendError::ModelNotReady)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server(Arc::new(NoModel), ApiConfig::default(), std::future::pending()).await
//! }
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod error;
mod router;
pub mod routes;
mod traits;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use traits::{AppStateProvider, AppStateWrapper};

use std::future::Future;

use tokio::net::TcpListener;

/// Build the router without binding, for in-process testing with `tower::ServiceExt`.
pub fn build_router(state: AppStateWrapper) -> axum::Router {
    router::configure_routes(state)
}

/// Bind `config.host:config.port` and serve until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server<F>(state: AppStateWrapper, config: ApiConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_addr()).await?;
    serve(listener, state, shutdown).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve<F>(listener: TcpListener, state: AppStateWrapper, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("SAM-Audio API listening on http://{}", addr);
    tracing::info!("OpenAPI spec: http://{}/api-doc/openapi.json", addr);

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("SAM-Audio API stopped");
    Ok(())
}
