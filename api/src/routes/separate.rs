//! Separation endpoint.
//!
//! Inference is synchronous and CPU/GPU bound, so the backend call runs on the
//! blocking pool. Admission is still decided without waiting: a request that
//! finds the gate held gets 503 immediately.

use axum::{extract::State, Json};
use sam_audio_values::{BackendError, ErrorBody, SeparateRequest, SeparateResponse};

use crate::error::{ApiError, ApiResult};
use crate::traits::AppStateWrapper;

/// Isolate the sound described by `prompt` from `audio_path`.
#[utoipa::path(
    post,
    path = "/separate",
    request_body = SeparateRequest,
    responses(
        (status = 200, description = "Target and residual written", body = SeparateResponse),
        (status = 400, description = "audio_path does not exist", body = ErrorBody),
        (status = 503, description = "Model not loaded, or a separation is already in progress", body = ErrorBody),
        (status = 500, description = "Separation failed", body = ErrorBody),
    ),
    tag = "Separation"
)]
pub async fn separate(
    State(state): State<AppStateWrapper>,
    Json(req): Json<SeparateRequest>,
) -> ApiResult<Json<SeparateResponse>> {
    let request_id = uuid::Uuid::new_v4();
    tracing::info!(
        request_id = %request_id,
        audio_path = %req.audio_path,
        prompt = %req.prompt,
        "Separation request"
    );

    let result = tokio::task::spawn_blocking(move || state.separate(&req))
        .await
        .map_err(|e| ApiError::Internal {
            message: format!("separation task aborted: {}", e),
            request_id: Some(request_id.to_string()),
        })?;

    match result {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                target_path = %response.target_path,
                sample_rate = response.sample_rate,
                "Separation succeeded"
            );
            Ok(Json(response))
        }
        Err(e @ (BackendError::ServerBusy | BackendError::ModelNotReady | BackendError::InvalidInput { .. })) => {
            tracing::warn!(request_id = %request_id, error = %e, "Separation rejected");
            Err(ApiError::from(e).with_request_id(request_id))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Separation failed");
            Err(ApiError::from(e).with_request_id(request_id))
        }
    }
}
