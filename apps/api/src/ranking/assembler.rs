//! Result Assembler: turns ranked candidates into the response payload.
//!
//! Duplicate resume ids from the backend are passed through as-is. Profile
//! lookups that miss, or a store that fails outright, fall back to a profile
//! synthesized from the resume id so every result is complete.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::matching::skills::PartialMatch;
use crate::models::candidate::CandidateDocument;
use crate::models::profile::{FileInfo, PersonalInfo, Profile};
use crate::models::score::{round_to, Score};
use crate::profiles::ProfileStore;
use crate::ranking::reranker::RankedCandidate;

const PLACEHOLDER_PREFIX_LEN: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub overall: Score,
    pub skill_match: Score,
    pub experience_match: Score,
    pub position_match: Score,
    pub semantic_match: Score,
    pub skill_coverage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillBreakdown {
    pub all: Vec<String>,
    pub matching: Vec<String>,
    pub missing: Vec<String>,
    pub partial_matches: Vec<PartialMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceSummary {
    pub years: f64,
    pub required: f64,
    pub difference: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub resume_id: String,
    pub scores: ScoreBreakdown,
    pub skills: SkillBreakdown,
    pub experience: ExperienceSummary,
    pub positions: Vec<String>,
    pub education: Vec<Value>,
    pub companies: Vec<Value>,
    pub projects: Vec<Value>,
    pub certifications: Vec<Value>,
    pub languages: Vec<Value>,
    pub summary: String,
    pub personal_info: PersonalInfo,
    pub file_info: FileInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub missing_count: usize,
    pub missing_percent: f64,
}

/// How profile enrichment went for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileReport {
    pub found: usize,
    pub synthesized: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Assembly
// ────────────────────────────────────────────────────────────────────────────

/// Keeps the best `max_results` candidates and attaches profiles to them.
pub async fn assemble(
    mut ranked: Vec<RankedCandidate>,
    max_results: usize,
    required_experience: f64,
    store: &dyn ProfileStore,
    resume_bucket: &str,
) -> (Vec<MatchResult>, ProfileReport) {
    ranked.truncate(max_results);

    let ids: Vec<String> = ranked
        .iter()
        .map(|c| c.hit.document.resume_id.clone())
        .filter(|id| !id.is_empty())
        .collect();

    let mut report = ProfileReport::default();
    let profiles = if ids.is_empty() {
        HashMap::new()
    } else {
        match store.lookup(&ids).await {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Profile lookup failed, synthesizing all profiles: {e}");
                report.store_error = Some(e.to_string());
                HashMap::new()
            }
        }
    };

    let results: Vec<MatchResult> = ranked
        .into_iter()
        .map(|candidate| {
            let profile = match profiles.get(&candidate.hit.document.resume_id) {
                Some(profile) => {
                    report.found += 1;
                    profile.clone()
                }
                None => {
                    report.synthesized += 1;
                    synthesize_profile(&candidate.hit.document, resume_bucket)
                }
            };
            build_result(candidate, profile, required_experience)
        })
        .collect();

    let unique: std::collections::HashSet<&str> =
        results.iter().map(|r| r.resume_id.as_str()).collect();
    info!(
        "Assembled {} results ({} unique ids, {} profiles found, {} synthesized)",
        results.len(),
        unique.len(),
        report.found,
        report.synthesized
    );

    (results, report)
}

fn build_result(
    candidate: RankedCandidate,
    profile: Profile,
    required_experience: f64,
) -> MatchResult {
    let RankedCandidate {
        hit,
        skill,
        skill_score,
        experience_score,
        position_score,
        rerank_score,
    } = candidate;
    let document = hit.document;

    let resume_id = if document.resume_id.is_empty() {
        "unknown".to_string()
    } else {
        document.resume_id
    };

    MatchResult {
        resume_id,
        scores: ScoreBreakdown {
            overall: rerank_score,
            skill_match: skill_score,
            experience_match: experience_score,
            position_match: position_score,
            semantic_match: hit.normalized_score,
            skill_coverage: skill.coverage,
        },
        skills: SkillBreakdown {
            all: document.skills,
            matching: skill.matching,
            missing: skill.missing,
            partial_matches: skill.partial_matches,
        },
        experience: ExperienceSummary {
            years: document.total_experience_years,
            required: required_experience,
            difference: round_to(document.total_experience_years - required_experience, 1),
        },
        positions: document.positions,
        education: document.education,
        companies: document.companies,
        projects: document.projects,
        certifications: document.certifications,
        languages: document.languages,
        summary: document.summary,
        personal_info: profile.personal_info,
        file_info: profile.file_info,
    }
}

/// Deterministic stand-in profile derived from the resume id and the
/// candidate's most recent position.
pub fn synthesize_profile(document: &CandidateDocument, resume_bucket: &str) -> Profile {
    let resume_id = document.resume_id.as_str();
    let prefix: String = resume_id.chars().take(PLACEHOLDER_PREFIX_LEN).collect();
    let prefix_chars: Vec<char> = prefix.chars().collect();

    let name = document
        .positions
        .iter()
        .map(|p| p.trim())
        .find(|p| !p.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Candidate {prefix}"));

    let email = if prefix.is_empty() {
        String::new()
    } else {
        format!("candidate-{}@example.com", prefix.to_lowercase())
    };

    let phone_number = if prefix_chars.len() >= 6 {
        let area: String = prefix_chars[..3].iter().collect();
        let line: String = prefix_chars[3..6].iter().collect();
        format!("(555) {area}-{line}")
    } else {
        String::new()
    };

    Profile {
        personal_info: PersonalInfo {
            name,
            email,
            phone_number,
            address: "Address information not available".to_string(),
            linkedin_url: String::new(),
        },
        file_info: FileInfo {
            s3_bucket: resume_bucket.to_string(),
            s3_key: if resume_id.is_empty() {
                String::new()
            } else {
                format!("processed/resumes/{resume_id}.pdf")
            },
            original_filename: if prefix.is_empty() {
                "resume.pdf".to_string()
            } else {
                format!("resume-{prefix}.pdf")
            },
            file_type: "pdf".to_string(),
        },
    }
}

/// Counts how often each required skill is missing across `results`,
/// most frequently missing first. Equal counts keep first-seen order.
pub fn skill_gap_analysis(results: &[MatchResult]) -> Vec<SkillGap> {
    if results.is_empty() {
        return Vec::new();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for result in results {
        for skill in &result.skills.missing {
            match counts.iter_mut().find(|(s, _)| *s == skill.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((skill.as_str(), 1)),
            }
        }
    }

    let total = results.len() as f64;
    let mut gaps: Vec<SkillGap> = counts
        .into_iter()
        .map(|(skill, missing_count)| SkillGap {
            skill: skill.to_string(),
            missing_count,
            missing_percent: round_to(missing_count as f64 / total * 100.0, 1),
        })
        .collect();
    gaps.sort_by(|a, b| b.missing_count.cmp(&a.missing_count));
    gaps
}
