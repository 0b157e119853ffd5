//! Per-user saved profiles. Append-only: every save is a new row.

pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::resume::CandidateProfile;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile: Json<CandidateProfile>,
    pub source: String,
    pub resume_key: Option<String>,
    pub created_at: DateTime<Utc>,
}
