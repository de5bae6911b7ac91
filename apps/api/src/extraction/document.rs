use axum::body::Bytes;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::extraction::models::DocumentType;

/// Decodes an uploaded résumé into plain text.
///
/// PDF goes through `pdf-extract`. Word documents are recognised but not
/// decoded here; callers are told to submit the extracted text instead.
pub fn decode_document(bytes: &[u8], document_type: DocumentType) -> Result<String, AppError> {
    match document_type {
        DocumentType::Pdf => {
            let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
                warn!("PDF extraction failed: {e}");
                AppError::UnprocessableEntity(format!("Could not read PDF: {e}"))
            })?;
            info!(bytes = bytes.len(), chars = text.len(), "decoded PDF résumé");
            Ok(text)
        }
        DocumentType::Docx => Err(AppError::UnsupportedMedia(
            "DOCX decoding is not available; submit the extracted text to /api/v1/resume/extract"
                .to_string(),
        )),
    }
}

/// Runs [`decode_document`] on the blocking pool so a large PDF does not
/// stall a runtime worker. A panic inside the decoder is reported as an
/// unreadable document.
pub async fn decode_document_blocking(
    bytes: Bytes,
    document_type: DocumentType,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || decode_document(&bytes, document_type))
        .await
        .map_err(|e| {
            error!("Document decoder task failed: {e}");
            AppError::UnprocessableEntity("Could not read the uploaded document".to_string())
        })?
}
