// Prompt constants and builder for candidate analysis.

use serde_json::Value;

use crate::analysis::sections::SECTION_HEADINGS;
use crate::analysis::{CandidateSnapshot, JobSnapshot};

pub const ANALYSIS_SYSTEM: &str = "You are an experienced technical recruiter. \
You write balanced, evidence-based candidate assessments for hiring managers. \
Only use the facts given in the candidate profile and job information.";

const NONE: &str = "None";
const NO_EDUCATION: &str = "No education information available";

/// Renders the candidate, the job and the scores into the analysis request.
pub fn build_analysis_prompt(candidate: &CandidateSnapshot, job: &JobSnapshot) -> String {
    let name = candidate
        .personal_info
        .as_ref()
        .and_then(|info| info.name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("Unknown candidate");
    let position = candidate
        .positions
        .first()
        .map(String::as_str)
        .unwrap_or("Not specified");
    let years = candidate
        .experience
        .as_ref()
        .and_then(|e| e.years)
        .unwrap_or(0.0);

    let skills = candidate.skills.clone().unwrap_or_default();
    let scores = candidate.scores.clone().unwrap_or_default();
    let skill_score = scores.skill_match.or(scores.skill_coverage);

    let mut prompt = String::from(
        "Analyze how well this candidate fits the position and write a detailed assessment.\n\n",
    );

    prompt.push_str("CANDIDATE PROFILE:\n");
    prompt.push_str(&format!("Name: {name}\n"));
    prompt.push_str(&format!("Current position: {position}\n"));
    prompt.push_str(&format!("Years of experience: {years}\n"));
    prompt.push_str(&format!("All skills: {}\n", join_or_none(&skills.all)));
    prompt.push_str(&format!("Matching skills: {}\n", join_or_none(&skills.matching)));
    prompt.push_str(&format!("Missing skills: {}\n", join_or_none(&skills.missing)));
    prompt.push_str(&format!("Education: {}\n\n", education_line(&candidate.education)));

    prompt.push_str("JOB INFORMATION:\n");
    prompt.push_str(&format!(
        "Title: {}\n",
        job.job_title.as_deref().unwrap_or("Not specified")
    ));
    prompt.push_str(&format!(
        "Required skills: {}\n",
        join_or_none(&job.required_skills)
    ));
    prompt.push_str(&format!(
        "Required experience: {} years\n\n",
        job.required_experience.unwrap_or(0.0)
    ));

    prompt.push_str("MATCH SCORES (0-100):\n");
    prompt.push_str(&format!("Overall: {}\n", score_text(scores.overall)));
    prompt.push_str(&format!("Skill match: {}\n", score_text(skill_score)));
    prompt.push_str(&format!(
        "Experience match: {}\n\n",
        score_text(scores.experience_match)
    ));

    prompt.push_str("Write the assessment under these numbered headings, in this order:\n");
    let guidance = [
        "two or three sentences on overall fit",
        "what the scores mean for this role",
        "the candidate's strongest qualifications for this job",
        "gaps or risks the hiring team should weigh",
        "specific topics and questions to cover in an interview",
        "advance, consider, or pass, with a one-line reason",
    ];
    for (i, (heading, hint)) in SECTION_HEADINGS.iter().zip(guidance).enumerate() {
        prompt.push_str(&format!("{}. {heading}: {hint}\n", i + 1));
    }

    prompt
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(", ")
    }
}

fn score_text(score: Option<f64>) -> String {
    score.map_or_else(|| "not available".to_string(), |s| format!("{s:.1}"))
}

/// "degree from institution (year)" for structured entries, text as-is.
fn education_entry(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(fields) => {
            let field = |key: &str| {
                fields
                    .get(key)
                    .and_then(|v| match v {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.is_empty())
            };
            let mut line = field("degree")?;
            if let Some(institution) = field("institution") {
                line.push_str(&format!(" from {institution}"));
            }
            if let Some(year) = field("year") {
                line.push_str(&format!(" ({year})"));
            }
            Some(line)
        }
        _ => None,
    }
}

fn education_line(entries: &[Value]) -> String {
    let lines: Vec<String> = entries.iter().filter_map(education_entry).collect();
    if lines.is_empty() {
        NO_EDUCATION.to_string()
    } else {
        lines.join("; ")
    }
}
