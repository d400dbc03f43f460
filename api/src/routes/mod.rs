//! API route handlers.

pub mod health;
pub mod separate;

use sam_audio_values::{ErrorBody, HealthResponse, SeparateRequest, SeparateResponse};
use utoipa::OpenApi;

/// OpenAPI documentation for all routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SAM-Audio Separation API",
        version = "1.0.0",
        description = "Text-prompted audio source separation behind a single-flight gate",
        license(name = "MIT")
    ),
    paths(health::health, separate::separate),
    components(schemas(HealthResponse, SeparateRequest, SeparateResponse, ErrorBody)),
    tags(
        (name = "System", description = "Service status"),
        (name = "Separation", description = "Audio source separation")
    )
)]
pub struct ApiDoc;
