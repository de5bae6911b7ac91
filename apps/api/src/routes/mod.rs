pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::providers::handlers as providers;
use crate::state::AppState;

/// Room for multipart framing around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume extraction
        .route("/api/v1/resume/extract", post(extraction::handle_extract))
        .route(
            "/api/v1/resume/upload",
            post(extraction::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Platform lookups
        .route(
            "/api/v1/sources/:source/:username",
            get(providers::handle_get_source),
        )
        // Analysis
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route(
            "/api/v1/analyze/profiles",
            post(analysis::handle_analyze_profiles),
        )
        .route(
            "/api/v1/analyze/narrative",
            post(analysis::handle_narrative),
        )
        .with_state(state)
}
