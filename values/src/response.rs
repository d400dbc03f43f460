//! Response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of a successful `POST /separate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeparateResponse {
    /// Isolated sound matching the prompt.
    pub target_path: String,
    /// Everything else.
    pub residual_path: String,
    /// Native sampling rate of the model, in Hz.
    pub sample_rate: u32,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Identifier of the loaded model, `None` before startup completes or after shutdown.
    pub model: Option<String>,
    /// Compute device string (`"cuda"` or `"cpu"`).
    pub device: String,
    /// Whether a CUDA GPU is available to the process.
    pub cuda: bool,
    /// Whether a separation currently holds the gate.
    pub busy: bool,
}

/// Problem-details body returned with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}
