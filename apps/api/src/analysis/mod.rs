//! Candidate Analysis: a written assessment of one ranked candidate.
//!
//! The caller sends back a result it got from the matching API together with
//! the job info; the language model writes a six-part assessment which is
//! returned both verbatim and split into sections.

pub mod handlers;
pub mod prompts;
pub mod sections;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::analysis::sections::{parse_analysis, CandidateAnalysis};
use crate::errors::AppError;
use crate::llm_client::{GenerationParams, LlmClient, LlmError, MODEL};
use crate::models::lenient;

// ────────────────────────────────────────────────────────────────────────────
// Input snapshots
// ────────────────────────────────────────────────────────────────────────────

/// The parts of a match result the assessment is written from. Accepts the
/// `results[]` entries of a match response as-is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidateSnapshot {
    #[serde(deserialize_with = "lenient::text_from_any")]
    pub resume_id: Option<String>,
    pub personal_info: Option<PersonalInfoSnapshot>,
    #[serde(deserialize_with = "lenient::one_or_many")]
    pub positions: Vec<String>,
    pub experience: Option<ExperienceSnapshot>,
    pub skills: Option<SkillSnapshot>,
    #[serde(deserialize_with = "lenient::values_or_empty")]
    pub education: Vec<Value>,
    pub scores: Option<ScoreSnapshot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonalInfoSnapshot {
    #[serde(deserialize_with = "lenient::text_from_any")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceSnapshot {
    #[serde(deserialize_with = "lenient::number_from_any")]
    pub years: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillSnapshot {
    #[serde(deserialize_with = "lenient::one_or_many")]
    pub all: Vec<String>,
    #[serde(deserialize_with = "lenient::one_or_many")]
    pub matching: Vec<String>,
    #[serde(deserialize_with = "lenient::one_or_many")]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoreSnapshot {
    #[serde(deserialize_with = "lenient::number_from_any")]
    pub overall: Option<f64>,
    #[serde(deserialize_with = "lenient::number_from_any")]
    pub skill_match: Option<f64>,
    #[serde(deserialize_with = "lenient::number_from_any")]
    pub skill_coverage: Option<f64>,
    #[serde(deserialize_with = "lenient::number_from_any")]
    pub experience_match: Option<f64>,
}

/// Accepts the `job_info` of a match response as-is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobSnapshot {
    #[serde(alias = "title", deserialize_with = "lenient::text_from_any")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient::skills_from_any")]
    pub required_skills: Vec<String>,
    #[serde(deserialize_with = "lenient::number_from_any")]
    pub required_experience: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation seam
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        params: GenerationParams,
    ) -> Result<String, LlmError>;

    fn model_id(&self) -> &str;
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        params: GenerationParams,
    ) -> Result<String, LlmError> {
        let response = self.call_with(prompt, system, params).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    fn model_id(&self) -> &str {
        MODEL
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct AnalysisOutcome {
    pub analysis: CandidateAnalysis,
    pub model_time_ms: u64,
}

pub struct CandidateAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl CandidateAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn model_id(&self) -> &str {
        self.generator.model_id()
    }

    pub async fn analyze(
        &self,
        candidate: &CandidateSnapshot,
        job: &JobSnapshot,
        params: GenerationParams,
    ) -> Result<AnalysisOutcome, AppError> {
        let prompt = build_analysis_prompt(candidate, job);

        let started = Instant::now();
        let text = self
            .generator
            .generate(&prompt, ANALYSIS_SYSTEM, params)
            .await
            .map_err(|e| AppError::Analysis(format!("candidate analysis failed: {e}")))?;
        let model_time_ms = started.elapsed().as_millis() as u64;

        let analysis = parse_analysis(&text);
        info!(
            "Analyzed candidate {} in {}ms ({} chars)",
            candidate.resume_id.as_deref().unwrap_or("<unknown>"),
            model_time_ms,
            text.len()
        );

        Ok(AnalysisOutcome {
            analysis,
            model_time_ms,
        })
    }
}
