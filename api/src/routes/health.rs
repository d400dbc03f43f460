//! Health check endpoint.
//!
//! A pure read of load state, device and gate occupancy. Never acquires the
//! gate, so it is safe to poll at any rate, including mid-separation.

use axum::{extract::State, Json};
use sam_audio_values::HealthResponse;

use crate::traits::AppStateWrapper;

/// Report model, device, GPU availability and whether a separation is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse),
    ),
    tag = "System"
)]
pub async fn health(State(state): State<AppStateWrapper>) -> Json<HealthResponse> {
    let response = state.health();
    tracing::debug!(
        model = ?response.model,
        device = %response.device,
        busy = response.busy,
        "Health check"
    );
    Json(response)
}
