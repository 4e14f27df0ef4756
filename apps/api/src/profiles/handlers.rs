//! Axum route handler for single profile lookups.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileLookupResponse {
    pub success: bool,
    pub data: ProfileRow,
}

/// Accepts any textual UUID form; anything else cannot be a stored id.
fn parse_resume_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation("Invalid resume ID format".to_string()))
}

/// GET /api/v1/profiles/:resume_id
///
/// Returns the identifying data stored for one resume.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
) -> Result<Json<ProfileLookupResponse>, AppError> {
    let resume_id = parse_resume_id(&resume_id)?;
    if !state.profiles.is_enabled() {
        return Err(AppError::Unavailable(
            "Profile store is not configured".to_string(),
        ));
    }

    let row = state
        .profiles
        .find(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    info!("Served profile for resume {resume_id}");
    Ok(Json(ProfileLookupResponse {
        success: true,
        data: row,
    }))
}
