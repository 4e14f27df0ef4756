//! Skill overlap scoring between a job's required skills and a candidate's skills.
//!
//! Rankings are compared across runs, so the credit values and the scan order
//! below are part of the contract: the same inputs must always produce the
//! same score.

use std::collections::HashSet;

use serde::Serialize;

use crate::matching::normalize::normalize_skill;
use crate::models::score::{round_to, Score};

/// Credit when the required skill appears inside a candidate skill ("python" in "python3").
const CONTAINED_IN_CANDIDATE_CREDIT: f64 = 0.75;
/// Credit when a candidate skill appears inside the required skill.
const CONTAINS_CANDIDATE_CREDIT: f64 = 0.5;
/// Credit for multi-word skills sharing enough words.
const WORD_OVERLAP_CREDIT: f64 = 0.5;
/// Neither side of a partial comparison may be shorter than this many characters.
const MIN_PARTIAL_LEN: usize = 4;
/// Share of required skills that must match exactly to earn the coverage bonus.
const BONUS_THRESHOLD: f64 = 0.7;
const BONUS_MULTIPLIER: f64 = 1.15;

/// A required skill credited through a non-exact candidate skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialMatch {
    pub required: String,
    #[serde(rename = "resume")]
    pub matched: String,
}

/// Outcome of comparing one candidate's skills against the required set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    pub score: Score,
    /// Candidate skills (as written) that exactly match a required skill.
    pub matching: Vec<String>,
    /// Required skills (as written) with no exact candidate match.
    pub missing: Vec<String>,
    pub partial_matches: Vec<PartialMatch>,
    /// Exact plus half-weighted partial matches over required skills, one decimal.
    pub coverage: f64,
}

/// Scores `candidate_skills` against `required_skills` on a 0–100 scale.
///
/// Algorithm:
/// 1. Normalize both lists.
/// 2. `exact` = required skills present in the candidate set.
/// 3. Each required skill without an exact match scans the candidate skills in
///    order (both sides at least 4 chars) and takes the first credit found:
///    - required inside candidate → 0.75
///    - candidate inside required → 0.5
///    - both multi-word and sharing ≥2 words, or 1 word when the required
///      phrase has ≤2 words → 0.5
/// 4. `score = (exact + partial) / required × 100`
/// 5. `exact ≥ 0.7 × required` multiplies the score by 1.15, capped at 100.
pub fn match_skills(required_skills: &[String], candidate_skills: &[String]) -> SkillMatch {
    let required: Vec<String> = required_skills.iter().map(|s| normalize_skill(s)).collect();
    let candidate: Vec<String> = candidate_skills.iter().map(|s| normalize_skill(s)).collect();
    let candidate_set: HashSet<&str> = candidate.iter().map(String::as_str).collect();
    let required_set: HashSet<&str> = required.iter().map(String::as_str).collect();

    let matching: Vec<String> = candidate_skills
        .iter()
        .zip(&candidate)
        .filter(|(_, norm)| required_set.contains(norm.as_str()))
        .map(|(raw, _)| raw.clone())
        .collect();

    let missing: Vec<String> = required_skills
        .iter()
        .zip(&required)
        .filter(|(_, norm)| !candidate_set.contains(norm.as_str()))
        .map(|(raw, _)| raw.clone())
        .collect();

    if required.is_empty() || candidate.is_empty() {
        return SkillMatch {
            score: Score::ZERO,
            matching,
            missing,
            partial_matches: Vec::new(),
            coverage: 0.0,
        };
    }

    let exact = required
        .iter()
        .filter(|skill| candidate_set.contains(skill.as_str()))
        .count();

    let mut partial_credit = 0.0;
    let mut partial_matches = Vec::new();

    for (raw_required, req) in required_skills.iter().zip(&required) {
        if candidate_set.contains(req.as_str()) {
            continue;
        }
        for (raw_candidate, cand) in candidate_skills.iter().zip(&candidate) {
            if let Some(credit) = partial_credit_for(req, cand) {
                partial_credit += credit;
                partial_matches.push(PartialMatch {
                    required: raw_required.clone(),
                    matched: raw_candidate.clone(),
                });
                break;
            }
        }
    }

    let required_count = required.len() as f64;
    let mut score = (exact as f64 + partial_credit) / required_count * 100.0;
    if exact as f64 >= required_count * BONUS_THRESHOLD {
        score = (score * BONUS_MULTIPLIER).min(100.0);
    }

    let coverage = round_to(
        (matching.len() as f64 + partial_matches.len() as f64 * 0.5) / required_count * 100.0,
        1,
    )
    .min(100.0);

    SkillMatch {
        score: Score::new(score),
        matching,
        missing,
        partial_matches,
        coverage,
    }
}

/// Partial credit earned by `candidate` toward `required`, if any.
fn partial_credit_for(required: &str, candidate: &str) -> Option<f64> {
    if required.chars().count() < MIN_PARTIAL_LEN || candidate.chars().count() < MIN_PARTIAL_LEN {
        return None;
    }

    if candidate.contains(required) {
        Some(CONTAINED_IN_CANDIDATE_CREDIT)
    } else if required.contains(candidate) {
        Some(CONTAINS_CANDIDATE_CREDIT)
    } else if required.contains(' ') && candidate.contains(' ') {
        let required_words: HashSet<&str> = required.split_whitespace().collect();
        let candidate_words: HashSet<&str> = candidate.split_whitespace().collect();
        let shared = required_words.intersection(&candidate_words).count();
        (shared >= 2 || (shared == 1 && required_words.len() <= 2)).then_some(WORD_OVERLAP_CREDIT)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_required_scores_zero() {
        let result = match_skills(&[], &skills(&["python"]));
        assert_eq!(result.score, Score::ZERO);
    }

    #[test]
    fn test_empty_candidate_scores_zero_and_everything_missing() {
        let result = match_skills(&skills(&["python", "aws"]), &[]);
        assert_eq!(result.score, Score::ZERO);
        assert_eq!(result.missing, skills(&["python", "aws"]));
    }

    #[test]
    fn test_two_of_three_exact_below_bonus_threshold() {
        let result = match_skills(
            &skills(&["python", "aws", "docker"]),
            &skills(&["python", "aws"]),
        );
        // 2 >= 0.7 * 3 = 2.1 is false, so no bonus
        assert_eq!(result.score.value(), 66.67);
        assert_eq!(result.missing, skills(&["docker"]));
        assert!(result.partial_matches.is_empty());
    }

    #[test]
    fn test_full_exact_match_capped_at_100() {
        let result = match_skills(
            &skills(&["python", "aws", "docker"]),
            &skills(&["Python", "AWS", "Docker"]),
        );
        assert_eq!(result.score, Score::MAX);
        assert_eq!(result.matching.len(), 3);
        assert_eq!(result.coverage, 100.0);
    }

    #[test]
    fn test_bonus_applies_at_threshold() {
        // 7 of 10 exact: 70 * 1.15 = 80.5
        let required = skills(&["a1", "a2", "a3", "a4", "a5", "a6", "a7", "b1", "b2", "b3"]);
        let candidate = skills(&["a1", "a2", "a3", "a4", "a5", "a6", "a7"]);
        let result = match_skills(&required, &candidate);
        assert_eq!(result.score.value(), 80.5);
    }

    #[test]
    fn test_required_inside_candidate_earns_three_quarters() {
        let result = match_skills(&skills(&["python"]), &skills(&["Python3"]));
        assert_eq!(result.score.value(), 75.0);
        assert_eq!(
            result.partial_matches,
            vec![PartialMatch {
                required: "python".to_string(),
                matched: "Python3".to_string()
            }]
        );
    }

    #[test]
    fn test_candidate_inside_required_earns_half() {
        let result = match_skills(&skills(&["spring boot"]), &skills(&["spring"]));
        assert_eq!(result.score.value(), 50.0);
    }

    #[test]
    fn test_short_skills_never_partially_match() {
        // "aws" is under 4 chars so "aws lambda" earns nothing
        let result = match_skills(&skills(&["aws"]), &skills(&["aws lambda"]));
        assert_eq!(result.score, Score::ZERO);
        assert!(result.partial_matches.is_empty());
    }

    #[test]
    fn test_word_overlap_two_shared_words() {
        let result = match_skills(
            &skills(&["distributed systems design"]),
            &skills(&["large distributed systems"]),
        );
        assert_eq!(result.score.value(), 50.0);
    }

    #[test]
    fn test_word_overlap_single_word_needs_short_required_phrase() {
        let short = match_skills(&skills(&["data pipelines"]), &skills(&["data science"]));
        assert_eq!(short.score.value(), 50.0);

        let long = match_skills(
            &skills(&["real time data"]),
            &skills(&["data science"]),
        );
        assert_eq!(long.score, Score::ZERO);
    }

    #[test]
    fn test_first_partial_hit_wins() {
        // both candidates contain "react"; only the first listed is credited
        let result = match_skills(
            &skills(&["react"]),
            &skills(&["reactive streams", "react native"]),
        );
        assert_eq!(result.partial_matches.len(), 1);
        assert_eq!(result.partial_matches[0].matched, "reactive streams");
        assert_eq!(result.score.value(), 75.0);
    }

    #[test]
    fn test_aliases_count_as_exact() {
        let result = match_skills(&skills(&["kubernetes", "javascript"]), &skills(&["k8s", "JS"]));
        assert_eq!(result.score, Score::MAX);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_coverage_counts_partials_at_half_weight() {
        let result = match_skills(&skills(&["python", "docker"]), &skills(&["python3", "docker"]));
        // 1 exact + 0.5 * 1 partial over 2 required
        assert_eq!(result.coverage, 75.0);
    }
}
