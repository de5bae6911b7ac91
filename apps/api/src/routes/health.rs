use axum::Json;
use serde_json::{json, Value};

use crate::extraction::skills::vocabulary_size;

/// GET /health
/// Returns a simple status object with service version and skill vocabulary size.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "skillVocabulary": vocabulary_size()
    }))
}
