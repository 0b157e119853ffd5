use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::AnalysisSource;
use crate::errors::AppError;
use crate::profiles::store::{latest_profile, profile_history, save_profile};
use crate::profiles::CandidateProfileRow;
use crate::resume::CandidateProfile;
use crate::state::AppState;
use crate::storage::is_user_resume_key;

#[derive(Deserialize)]
pub struct SaveProfileRequest {
    pub profile: CandidateProfile,
    #[serde(default = "manual_source")]
    pub source: AnalysisSource,
    pub resume_key: Option<String>,
}

fn manual_source() -> AnalysisSource {
    AnalysisSource::Manual
}

/// PUT /api/v1/profiles/:user_id
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SaveProfileRequest>,
) -> Result<Json<CandidateProfileRow>, AppError> {
    if let Some(key) = &req.resume_key {
        if !is_user_resume_key(user_id, key) {
            return Err(AppError::Validation(
                "resume_key does not belong to this user".to_string(),
            ));
        }
    }

    let profile = req.profile.within_limits(state.analyzer.limits());
    let row = save_profile(
        &state.db,
        user_id,
        &profile,
        req.source,
        req.resume_key.as_deref(),
    )
    .await?;
    Ok(Json(row))
}

/// GET /api/v1/profiles/:user_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CandidateProfileRow>, AppError> {
    let row = latest_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No saved profile for user {user_id}")))?;
    Ok(Json(row))
}

/// GET /api/v1/profiles/:user_id/history
pub async fn handle_profile_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<CandidateProfileRow>>, AppError> {
    Ok(Json(profile_history(&state.db, user_id).await?))
}
