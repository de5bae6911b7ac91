//! Axum route handlers for platform lookups.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::analysis::sources::SourceId;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/sources/:source/:username
///
/// Returns the cached or freshly fetched metrics for one platform profile.
pub async fn handle_get_source(
    State(state): State<AppState>,
    Path((source, username)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let source = SourceId::parse(&source)
        .ok_or_else(|| AppError::NotFound(format!("Unknown source '{source}'")))?;

    let metrics = match source {
        SourceId::Github => serde_json::to_value(state.providers.github.fetch(&username).await?),
        SourceId::Leetcode => {
            serde_json::to_value(state.providers.leetcode.fetch(&username).await?)
        }
        SourceId::Hackerrank => {
            serde_json::to_value(state.providers.hackerrank.fetch(&username).await?)
        }
        SourceId::Resume => {
            return Err(AppError::Validation(
                "Resume data comes from /api/v1/resume/upload, not a platform lookup".to_string(),
            ))
        }
    }
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(metrics))
}
