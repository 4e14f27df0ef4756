//! Axum route handler for the Candidate Analysis API.

use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::sections::CandidateAnalysis;
use crate::analysis::{CandidateSnapshot, JobSnapshot};
use crate::errors::AppError;
use crate::llm_client::GenerationParams;
use crate::models::lenient;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisParameters {
    #[serde(
        alias = "maxTokens",
        alias = "max_gen_len",
        deserialize_with = "lenient::number_from_any"
    )]
    pub max_tokens: Option<f64>,
    #[serde(deserialize_with = "lenient::number_from_any")]
    pub temperature: Option<f64>,
}

/// Body of `POST /api/v1/analysis`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(alias = "candidate_data")]
    pub candidate_data: Option<CandidateSnapshot>,
    #[serde(alias = "job_info")]
    pub job_info: Option<JobSnapshot>,
    pub parameters: Option<AnalysisParameters>,
}

pub type ValidatedAnalysis = (CandidateSnapshot, JobSnapshot, GenerationParams);

fn missing_field(name: &str) -> AppError {
    AppError::Validation(format!("Missing required field: {name}"))
}

impl AnalysisRequest {
    /// Decodes a raw body, naming the first missing section.
    pub fn from_body(body: Value) -> Result<ValidatedAnalysis, AppError> {
        let request: AnalysisRequest = serde_json::from_value(body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;

        let candidate = request
            .candidate_data
            .ok_or_else(|| missing_field("candidateData"))?;
        let job = request.job_info.ok_or_else(|| missing_field("jobInfo"))?;
        let params = request
            .parameters
            .map(|p| GenerationParams::bounded(p.max_tokens, p.temperature))
            .unwrap_or_default();

        Ok((candidate, job, params))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalysisMetadata {
    pub model: String,
    pub parameters: GenerationParams,
    pub processing_time_ms: u64,
    pub model_processing_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub message: String,
    pub data: CandidateAnalysis,
    pub metadata: AnalysisMetadata,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
///
/// Writes an assessment of one candidate from a match result and its job info.
pub async fn handle_analysis(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let started = Instant::now();
    let (candidate, job, params) = AnalysisRequest::from_body(body)?;

    let analyzer = state.analyzer.as_ref().ok_or_else(|| {
        AppError::Unavailable("Candidate analysis requires ANTHROPIC_API_KEY".to_string())
    })?;
    let outcome = analyzer.analyze(&candidate, &job, params).await?;

    Ok(Json(AnalysisResponse {
        success: true,
        message: "Successfully analyzed candidate profile".to_string(),
        data: outcome.analysis,
        metadata: AnalysisMetadata {
            model: analyzer.model_id().to_string(),
            parameters: params,
            processing_time_ms: started.elapsed().as_millis() as u64,
            model_processing_time_ms: outcome.model_time_ms,
        },
    }))
}
