use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::AnalysisSource;
use crate::profiles::CandidateProfileRow;
use crate::resume::CandidateProfile;

/// Inserts a new profile row for `user_id`. Earlier rows are kept as history.
pub async fn save_profile(
    pool: &PgPool,
    user_id: Uuid,
    profile: &CandidateProfile,
    source: AnalysisSource,
    resume_key: Option<&str>,
) -> Result<CandidateProfileRow, sqlx::Error> {
    let row = sqlx::query_as::<_, CandidateProfileRow>(
        r#"
        INSERT INTO candidate_profiles (user_id, profile, source, resume_key)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, profile, source, resume_key, created_at
        "#,
    )
    .bind(user_id)
    .bind(Json(profile))
    .bind(source.as_str())
    .bind(resume_key)
    .fetch_one(pool)
    .await?;

    info!("Saved profile {} ({}) for user {user_id}", row.id, row.source);
    Ok(row)
}

/// The most recently saved profile for a user.
pub async fn latest_profile(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<CandidateProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateProfileRow>(
        r#"
        SELECT id, user_id, profile, source, resume_key, created_at
        FROM candidate_profiles
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Every saved profile for a user, newest first.
pub async fn profile_history(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CandidateProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateProfileRow>(
        r#"
        SELECT id, user_id, profile, source, resume_key, created_at
        FROM candidate_profiles
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
