pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

/// Room for multipart boundaries and the small form fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Résumé analysis
        .route(
            "/api/v1/resumes/analyze",
            post(analysis::handle_analyze_upload),
        )
        .route(
            "/api/v1/resumes/analyze-text",
            post(analysis::handle_analyze_text),
        )
        // Saved profiles
        .route(
            "/api/v1/profiles/:user_id",
            get(profiles::handle_get_profile).put(profiles::handle_save_profile),
        )
        .route(
            "/api/v1/profiles/:user_id/history",
            get(profiles::handle_profile_history),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
