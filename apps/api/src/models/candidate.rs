//! Candidate documents as stored in the search index.
//!
//! The index is written by an upstream ingestion job whose field shapes have
//! drifted over time, so decoding is lenient: scalars are accepted where lists
//! are expected and numbers may arrive as strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::lenient;

/// Fields requested from the search backend for every hit.
pub const SOURCE_FIELDS: [&str; 10] = [
    "resume_id",
    "skills",
    "total_experience",
    "positions",
    "education",
    "companies",
    "projects",
    "certifications",
    "languages",
    "summary",
];

/// Name of the dense-vector field in the index.
pub const EMBEDDING_FIELD: &str = "resume_embedding";

/// A candidate profile read from the index. Read-only to this service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateDocument {
    #[serde(default, deserialize_with = "lenient::string_or_default")]
    pub resume_id: String,
    #[serde(default, deserialize_with = "lenient::one_or_many")]
    pub skills: Vec<String>,
    #[serde(
        default,
        rename = "total_experience",
        deserialize_with = "lenient::years_or_zero"
    )]
    pub total_experience_years: f64,
    #[serde(default, deserialize_with = "lenient::one_or_many")]
    pub positions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::values_or_empty")]
    pub education: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::values_or_empty")]
    pub companies: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::values_or_empty")]
    pub projects: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::values_or_empty")]
    pub certifications: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::values_or_empty")]
    pub languages: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::string_or_default")]
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_document_deserializes() {
        let doc: CandidateDocument = serde_json::from_value(json!({
            "resume_id": "8d0c6a8e-1b7e-4c5e-9f55-0a4a3e1f2b77",
            "skills": ["Python", "AWS"],
            "total_experience": 6.5,
            "positions": ["Senior Python Engineer"],
            "education": [{"degree": "BSc Computer Science"}],
            "summary": "Backend engineer"
        }))
        .unwrap();

        assert_eq!(doc.skills, vec!["Python", "AWS"]);
        assert_eq!(doc.total_experience_years, 6.5);
        assert_eq!(doc.positions.len(), 1);
        assert_eq!(doc.education.len(), 1);
        assert!(doc.companies.is_empty());
    }

    #[test]
    fn test_stored_vector_field_is_ignored() {
        let doc: CandidateDocument = serde_json::from_value(json!({
            "resume_id": "r1",
            "resume_embedding": [0.1, 0.2, 0.3]
        }))
        .unwrap();
        assert_eq!(doc.resume_id, "r1");
        let encoded = serde_json::to_value(&doc).unwrap();
        assert!(encoded.get(EMBEDDING_FIELD).is_none());
    }

    #[test]
    fn test_scalar_skill_becomes_single_item_list() {
        let doc: CandidateDocument =
            serde_json::from_value(json!({"resume_id": "r1", "skills": "Rust"})).unwrap();
        assert_eq!(doc.skills, vec!["Rust"]);
    }

    #[test]
    fn test_experience_accepts_numeric_string_and_null() {
        let doc: CandidateDocument =
            serde_json::from_value(json!({"resume_id": "r1", "total_experience": "4"})).unwrap();
        assert_eq!(doc.total_experience_years, 4.0);

        let doc: CandidateDocument =
            serde_json::from_value(json!({"resume_id": "r1", "total_experience": null})).unwrap();
        assert_eq!(doc.total_experience_years, 0.0);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let doc: CandidateDocument = serde_json::from_value(json!({})).unwrap();
        assert!(doc.resume_id.is_empty());
        assert!(doc.skills.is_empty());
        assert_eq!(doc.total_experience_years, 0.0);
    }

    #[test]
    fn test_blank_and_null_skills_are_dropped() {
        let doc: CandidateDocument =
            serde_json::from_value(json!({"skills": ["Go", "", null, "  "]})).unwrap();
        assert_eq!(doc.skills, vec!["Go"]);
    }
}
