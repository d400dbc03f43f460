//! Backend trait used by every transport.
//!
//! ```text
//! ┌──────────────┐
//! │  HTTP (axum) │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────────┐
//! │ AppStateProvider │  health() / separate()
//! └──────┬───────────┘
//!        ▼
//! ┌──────────────────┐
//! │ gate + model host│
//! └──────────────────┘
//! ```

use crate::{BackendResult, HealthResponse, SeparateRequest, SeparateResponse};

/// Backend operations behind the HTTP endpoints.
///
/// Both methods are synchronous. `separate` runs inference on the calling
/// thread, so async transports must call it from a blocking context.
pub trait AppStateProvider: Send + Sync {
    /// Pure read of load state, device and gate occupancy. Never blocks.
    fn health(&self) -> HealthResponse;

    /// Validate, admit, run and persist one separation.
    fn separate(&self, request: &SeparateRequest) -> BackendResult<SeparateResponse>;
}

impl<T: AppStateProvider + ?Sized> AppStateProvider for std::sync::Arc<T> {
    fn health(&self) -> HealthResponse {
        (**self).health()
    }

    fn separate(&self, request: &SeparateRequest) -> BackendResult<SeparateResponse> {
        (**self).separate(request)
    }
}
