use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::ProfileAnalysis;
use crate::errors::AppError;
use crate::resume::{extract_pdf_text, PdfText};
use crate::state::AppState;
use crate::storage::archive_resume;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub upload_id: Uuid,
    /// Set when the upload was archived for a known user.
    pub resume_key: Option<String>,
    pub analysis: ProfileAnalysis,
}

#[derive(Deserialize)]
pub struct AnalyzeTextRequest {
    pub raw_text: String,
}

struct Upload {
    file: Bytes,
    user_id: Option<Uuid>,
}

/// POST /api/v1/resumes/analyze
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Upload { file, user_id } = read_upload(multipart).await?;

    let max = state.config.max_upload_bytes;
    if file.len() > max {
        return Err(AppError::PayloadTooLarge(format!(
            "file is {} bytes, the limit is {max}",
            file.len()
        )));
    }

    let upload_id = Uuid::new_v4();
    info!(%upload_id, bytes = file.len(), "analyzing résumé upload");

    // An empty file has no text to find, same as a scanned one.
    let text = if file.is_empty() {
        PdfText::ImageBased
    } else {
        let pdf = file.clone();
        tokio::task::spawn_blocking(move || extract_pdf_text(&pdf))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))??
    };

    let analysis = state.analyzer.analyze(&text).await;

    let resume_key = match user_id {
        Some(user_id) if !file.is_empty() => {
            match archive_resume(&state.s3, &state.config.s3_bucket, user_id, upload_id, file).await {
                Ok(key) => Some(key),
                Err(e) => {
                    error!(%upload_id, "résumé archive failed: {e:?}");
                    None
                }
            }
        }
        _ => None,
    };

    Ok(Json(AnalyzeResponse {
        upload_id,
        resume_key,
        analysis,
    }))
}

/// POST /api/v1/resumes/analyze-text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Json<ProfileAnalysis> {
    let text = PdfText::from_text(req.raw_text);
    Json(state.analyzer.analyze(&text).await)
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut file = None;
    let mut user_id = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => file = Some(field.bytes().await.map_err(multipart_error)?),
            Some("user_id") => {
                let raw = field.text().await.map_err(multipart_error)?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    let id = Uuid::parse_str(raw)
                        .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?;
                    user_id = Some(id);
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    Ok(Upload { file, user_id })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("invalid multipart body: {}", e.body_text()))
    }
}
