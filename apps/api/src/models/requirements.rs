use serde::{Deserialize, Serialize};

/// Structured requirements extracted from a free-text job description.
///
/// Produced once per distinct job text and never mutated afterwards; the
/// requirement cache hands out clones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    pub title: Option<String>,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    /// Always finite and `>= 0`.
    pub required_experience_years: f64,
    pub seniority: Option<String>,
    pub industry: Option<String>,
    pub job_type: Option<String>,
    pub required_education: Option<String>,
}

impl JobRequirements {
    /// Title for display, with the same placeholder the extractor prompt uses.
    pub fn display_title(&self) -> &str {
        present(&self.title).unwrap_or("Not specified")
    }
}

/// Returns the trimmed value when it carries any text.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
