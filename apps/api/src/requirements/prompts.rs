// Prompt constants for requirement extraction.

/// System prompt for requirement extraction: enforces JSON-only output.
pub const EXTRACT_SYSTEM: &str = "You are an expert job description analyzer. \
    Extract structured hiring requirements from a job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Extraction prompt template. Replace `{jd_text}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the following information from the job description below:

1. Job Title
2. Required Years of Experience (as a number only)
3. Required Skills (as a list)
4. Nice-to-Have Skills (as a list)
5. Seniority Level (e.g., Junior, Mid-level, Senior, Lead)
6. Job Type (e.g., Full-time, Contract, Remote)
7. Industry
8. Required Education (e.g., Bachelor's, Master's)

Return a JSON object with this EXACT schema (no extra fields):
{
  "job_title": "string",
  "required_experience": 0,
  "required_skills": ["skill1", "skill2"],
  "nice_to_have_skills": ["skill1", "skill2"],
  "seniority_level": "string",
  "job_type": "string",
  "industry": "string",
  "required_education": "string"
}

Rules:
- required_experience is a plain number of years; use 0 if none is stated.
- Skills are short technology or competency names ("Python", "Kubernetes"), not sentences.
- Use an empty string or empty list when a field is not mentioned. Do NOT guess.

Job description:
{jd_text}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_placeholder_once() {
        assert_eq!(EXTRACT_PROMPT_TEMPLATE.matches("{jd_text}").count(), 1);
    }
}
