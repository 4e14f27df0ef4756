//! Axum route handlers for the Matching API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::ranking::engine::{MatchQuery, MatchResponse};
use crate::state::AppState;

const MIN_JOB_DESCRIPTION_CHARS: usize = 10;
const DEFAULT_MAX_RESULTS: i64 = 30;
const MAX_RESULTS_LIMIT: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/v1/match` and the query string of `GET /api/v1/match`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(alias = "job_description")]
    pub job_description_text: Option<String>,
    #[serde(alias = "max_results")]
    pub max_results: Option<i64>,
    #[serde(alias = "min_experience")]
    pub min_experience: Option<f64>,
}

impl MatchRequest {
    /// Rejects short job text; clamps the numeric options into range.
    pub fn validate(self) -> Result<MatchQuery, AppError> {
        let job_description = self
            .job_description_text
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        if job_description.is_empty() {
            return Err(AppError::Validation(
                "jobDescriptionText must be provided".to_string(),
            ));
        }
        if job_description.chars().count() < MIN_JOB_DESCRIPTION_CHARS {
            return Err(AppError::Validation(format!(
                "jobDescriptionText is too short (minimum {MIN_JOB_DESCRIPTION_CHARS} characters)"
            )));
        }

        let max_results = self
            .max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, MAX_RESULTS_LIMIT) as usize;

        let min_experience = self
            .min_experience
            .filter(|years| years.is_finite())
            .unwrap_or(0.0)
            .max(0.0);

        Ok(MatchQuery {
            job_description,
            max_results,
            min_experience,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Ranks indexed candidates against the job description in the body.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let query = request.validate()?;
    let response = state.ranking.rank(&query).await?;
    Ok(Json(response))
}

/// GET /api/v1/match?job_description=...
///
/// Same as the POST form, for callers that can only issue GET requests.
pub async fn handle_match_query(
    State(state): State<AppState>,
    Query(request): Query<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let query = request.validate()?;
    let response = state.ranking.rank(&query).await?;
    Ok(Json(response))
}
