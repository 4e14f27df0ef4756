//! Model-backed requirement extraction.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, MODEL};
use crate::models::lenient;
use crate::models::requirements::JobRequirements;
use crate::requirements::heuristic;
use crate::requirements::prompts::{EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM};
use crate::requirements::RequirementExtractor;

/// Raw model output. Every field is optional; models omit and mistype fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedRequirements {
    #[serde(deserialize_with = "lenient::text_from_any")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient::number_from_any")]
    pub required_experience: Option<f64>,
    #[serde(deserialize_with = "lenient::skills_from_any")]
    pub required_skills: Vec<String>,
    #[serde(deserialize_with = "lenient::skills_from_any")]
    pub nice_to_have_skills: Vec<String>,
    #[serde(deserialize_with = "lenient::text_from_any")]
    pub seniority_level: Option<String>,
    #[serde(deserialize_with = "lenient::text_from_any")]
    pub job_type: Option<String>,
    #[serde(deserialize_with = "lenient::text_from_any")]
    pub industry: Option<String>,
    #[serde(deserialize_with = "lenient::text_from_any")]
    pub required_education: Option<String>,
}

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("not specified"))
}

impl ExtractedRequirements {
    /// Converts model output, filling a missing title, experience or skill
    /// list from pattern matching over the job text.
    pub fn into_requirements(self, job_text: &str) -> JobRequirements {
        let mut required_skills = clean_skills(self.required_skills);
        if required_skills.is_empty() {
            required_skills = heuristic::extract_skills(job_text);
        }

        let required_experience_years = match self.required_experience {
            Some(years) if years > 0.0 => years,
            _ => heuristic::extract_experience_years(job_text).unwrap_or(0.0),
        };

        JobRequirements {
            title: clean_text(self.job_title).or_else(|| heuristic::extract_title(job_text)),
            required_skills,
            nice_to_have_skills: clean_skills(self.nice_to_have_skills),
            required_experience_years,
            seniority: clean_text(self.seniority_level),
            industry: clean_text(self.industry),
            job_type: clean_text(self.job_type),
            required_education: clean_text(self.required_education),
        }
    }
}

/// Extracts requirements with the language model.
///
/// Model failures are returned to the caller; there is no silent downgrade to
/// pattern matching when the model is configured but unavailable.
pub struct LlmRequirementExtractor {
    llm: LlmClient,
}

impl LlmRequirementExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl RequirementExtractor for LlmRequirementExtractor {
    async fn extract(&self, job_text: &str) -> Result<JobRequirements, AppError> {
        let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{jd_text}", job_text);
        let extracted: ExtractedRequirements = self
            .llm
            .call_json(&prompt, EXTRACT_SYSTEM)
            .await
            .map_err(|e| AppError::Extraction(format!("requirement extraction failed: {e}")))?;

        let requirements = extracted.into_requirements(job_text);
        info!(
            "Extracted requirements: title={:?}, {} required skills, {} years",
            requirements.title,
            requirements.required_skills.len(),
            requirements.required_experience_years
        );
        Ok(requirements)
    }

    fn model_id(&self) -> &str {
        MODEL
    }
}
