//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::narrative::{narrate, Narrative};
use crate::analysis::report::{build_report, AnalysisReport};
use crate::analysis::sources::SourceMetricsSet;
use crate::errors::AppError;
use crate::extraction::models::CandidateRecord;
use crate::providers::ProfileHandles;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// A candidate record plus whatever platform metrics the caller already has.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub candidate: Option<CandidateRecord>,
    #[serde(flatten)]
    pub metrics: SourceMetricsSet,
}

/// A candidate record plus platform usernames to look up.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesRequest {
    #[serde(default)]
    pub candidate: Option<CandidateRecord>,
    #[serde(flatten)]
    pub handles: ProfileHandles,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeResponse {
    pub report: AnalysisReport,
    pub narrative: Narrative,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Scores the supplied sources and builds a fresh report. Absent sources are
/// left out, never scored as zero.
pub async fn handle_analyze(Json(request): Json<AnalyzeRequest>) -> Json<AnalysisReport> {
    Json(build_report(request.candidate.as_ref(), &request.metrics))
}

/// POST /api/v1/analyze/profiles
///
/// Fetches the named platform profiles concurrently, then builds the report.
/// A profile that cannot be fetched is treated as not connected.
pub async fn handle_analyze_profiles(
    State(state): State<AppState>,
    Json(request): Json<ProfilesRequest>,
) -> Json<AnalysisReport> {
    let metrics = state.providers.fetch_all(&request.handles).await;
    if !request.handles.is_empty() && metrics.is_empty() {
        warn!("none of the requested profiles could be fetched");
    }
    Json(build_report(request.candidate.as_ref(), &metrics))
}

/// POST /api/v1/analyze/narrative
///
/// Builds the report and asks the LLM for a short elaboration of it.
pub async fn handle_narrative(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<NarrativeResponse>, AppError> {
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::Validation(
            "Narrative enrichment is not configured; set ANTHROPIC_API_KEY".to_string(),
        )
    })?;

    let report = build_report(request.candidate.as_ref(), &request.metrics);
    if !report.has_data() {
        return Err(AppError::Validation(
            "Provide a candidate record or at least one platform's metrics".to_string(),
        ));
    }

    let narrative = narrate(&report, llm).await?;

    Ok(Json(NarrativeResponse { report, narrative }))
}
