//! Axum route handlers for résumé extraction.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::document::decode_document_blocking;
use crate::extraction::extract_fields;
use crate::extraction::models::{CandidateRecord, DocumentType, RawDocument};
use crate::state::AppState;

/// Multipart field carrying the résumé file.
pub const UPLOAD_FIELD: &str = "resume";

/// POST /api/v1/resume/extract
///
/// Extracts a candidate record from already-decoded text. Missing fields are
/// sentinels, never errors.
pub async fn handle_extract(Json(document): Json<RawDocument>) -> Json<CandidateRecord> {
    Json(extract_fields(&document.text, document.document_type))
}

/// POST /api/v1/resume/upload
///
/// Accepts a multipart upload with a `resume` file field, decodes it and
/// returns the extracted record.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CandidateRecord>, AppError> {
    let limit = state.config.max_upload_bytes;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let document_type = DocumentType::detect(field.content_type(), file_name.as_deref())
            .ok_or_else(|| {
                AppError::UnsupportedMedia("Only PDF and DOCX résumés are accepted".to_string())
            })?;

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "Résumé exceeds the {limit} byte upload limit"
            )));
        }

        info!(
            file = file_name.as_deref().unwrap_or("<unnamed>"),
            kind = document_type.as_str(),
            bytes = bytes.len(),
            "résumé uploaded"
        );

        let text = decode_document_blocking(bytes, document_type).await?;
        return Ok(Json(extract_fields(&text, document_type)));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{UPLOAD_FIELD}' is required"
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}
