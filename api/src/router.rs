//! Router configuration and setup.

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;

use crate::routes::{self, ApiDoc};
use crate::traits::AppStateWrapper;

/// Build the full router with state and middleware applied.
pub fn configure_routes(state: AppStateWrapper) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/separate", post(routes::separate::separate))
        .route("/api-doc/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
