//! Search text composition and backend query bodies.

use serde_json::{json, Value};

use crate::models::candidate::{EMBEDDING_FIELD, SOURCE_FIELDS};
use crate::models::requirements::{present, JobRequirements};

/// Below this many structured parts the raw job text is searched instead.
const MIN_FOCUSED_PARTS: usize = 3;

const KNN_BOOST: f64 = 3.0;
const KEYWORD_BOOST: f64 = 1.0;
const SKILL_PHRASE_BOOST: f64 = 1.5;
const MAX_SKILL_PHRASES: usize = 10;
const MIN_SKILL_PHRASE_LEN: usize = 3;
const TIE_BREAKER: f64 = 0.3;
/// Edit distance 0 for terms under 4 chars, 1 up to 7, 2 beyond.
const FUZZINESS: &str = "AUTO:4,7";

/// Keyword fields and their boosts for the fuzzy multi-field component.
const KEYWORD_FIELDS: [&str; 6] = [
    "skills^3",
    "positions^2.5",
    "summary^1.5",
    "companies.description^1",
    "projects.description^1",
    "education.degree^1",
];

/// Builds the search text from extracted requirements.
///
/// Lines are emitted in a fixed order, each only when the field has content.
/// Fewer than three lines means the extraction was too thin to trust, and the
/// original job text is returned unchanged.
pub fn compose_focused_query(job_text: &str, requirements: &JobRequirements) -> String {
    let mut parts = Vec::new();

    if let Some(title) = present(&requirements.title) {
        parts.push(format!("Job Title: {title}"));
    }
    if !requirements.required_skills.is_empty() {
        parts.push(format!(
            "Required Skills: {}",
            requirements.required_skills.join(", ")
        ));
    }
    if !requirements.nice_to_have_skills.is_empty() {
        parts.push(format!(
            "Nice-to-have Skills: {}",
            requirements.nice_to_have_skills.join(", ")
        ));
    }
    if let Some(seniority) = present(&requirements.seniority) {
        parts.push(format!("Seniority Level: {seniority}"));
    }
    if let Some(industry) = present(&requirements.industry) {
        parts.push(format!("Industry: {industry}"));
    }

    if parts.len() >= MIN_FOCUSED_PARTS {
        parts.join("\n")
    } else {
        job_text.to_string()
    }
}

/// Number of hits to fetch: three times what will be returned, within [30, 100].
pub fn initial_size(max_results: usize) -> usize {
    (max_results.saturating_mul(3)).clamp(30, 100)
}

/// Hybrid query: kNN over the embedding, fuzzy keyword match over the focused
/// text, and phrase boosts for individual required skills.
pub fn hybrid_query(
    focused_query: &str,
    embedding: &[f32],
    required_skills: &[String],
    size: usize,
) -> Value {
    let mut should = vec![
        json!({
            "knn": {
                EMBEDDING_FIELD: {
                    "vector": embedding,
                    "k": size,
                    "boost": KNN_BOOST
                }
            }
        }),
        json!({
            "multi_match": {
                "query": focused_query,
                "fields": KEYWORD_FIELDS,
                "type": "best_fields",
                "tie_breaker": TIE_BREAKER,
                "fuzziness": FUZZINESS,
                "boost": KEYWORD_BOOST
            }
        }),
    ];

    should.extend(
        required_skills
            .iter()
            .take(MAX_SKILL_PHRASES)
            .filter(|skill| skill.chars().count() >= MIN_SKILL_PHRASE_LEN)
            .map(|skill| {
                json!({
                    "match_phrase": {
                        "skills": {
                            "query": skill,
                            "boost": SKILL_PHRASE_BOOST
                        }
                    }
                })
            }),
    );

    json!({
        "size": size,
        "query": {
            "bool": {
                "should": should,
                "minimum_should_match": 1
            }
        },
        "_source": SOURCE_FIELDS
    })
}

/// Vector-only query used when hybrid retrieval is unavailable or empty.
pub fn vector_query(embedding: &[f32], size: usize) -> Value {
    json!({
        "size": size,
        "query": {
            "knn": {
                EMBEDDING_FIELD: {
                    "vector": embedding,
                    "k": size
                }
            }
        },
        "_source": SOURCE_FIELDS
    })
}
