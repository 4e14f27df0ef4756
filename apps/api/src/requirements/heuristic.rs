//! Pattern-based requirement extraction used when no language model is configured,
//! and to fill fields a model response left empty.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::errors::AppError;
use crate::models::requirements::JobRequirements;
use crate::requirements::RequirementExtractor;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.:\n]{5,100})").expect("title pattern is valid"));

static EXPERIENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)(?:\s*[-+]?\s*\d*)?\s+years?\s+(?:of\s+)?experience")
        .expect("experience pattern is valid")
});

/// Technology vocabulary recognised in free text.
const KNOWN_SKILLS: &[&str] = &[
    "python", "java", "javascript", "react", "angular", "node", "aws", "azure", "gcp", "docker",
    "kubernetes", "sql", "nosql", "mongodb", "postgresql", "mysql", "oracle", "rest", "api",
    "microservices", "ci/cd", "devops", "agile", "scrum", "git", "machine learning", "ai",
    "data science", "big data", "hadoop", "spark", "tableau", "power bi", "excel", "jira",
    "confluence", "linux", "unix", "windows", "c#", "c++", "ruby", "php", "html", "css", "sass",
    "typescript", "vue", "redux", "graphql", "django", "flask", "spring", "hibernate", "jenkins",
    "terraform", "ansible", "puppet", "chef", "blockchain", "ethereum", "solidity", "ios",
    "android", "swift", "kotlin", "react native", "flutter", "xamarin", "unity", "unreal", "sap",
    "salesforce", "dynamics", "sharepoint", "azure devops", "aws lambda", "serverless", "kafka",
    "rabbitmq", "redis", "elasticsearch", "kibana", "logstash", "grafana", "prometheus",
    "datadog", "new relic", "splunk", "nginx", "apache", "tomcat", "maven", "gradle", "npm",
    "yarn", "webpack", "babel", "jest", "mocha", "cypress", "selenium", "junit", "pytest",
    "rspec", "cucumber", "rust", "golang", "scala",
];

/// First line-like span of 5–100 characters, cut at `.`, `:` or a newline.
pub fn extract_title(text: &str) -> Option<String> {
    TITLE_RE
        .captures(text.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Years from the first "N years (of) experience" phrase.
pub fn extract_experience_years(text: &str) -> Option<f64> {
    EXPERIENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Known skills mentioned in `text`, in vocabulary order.
pub fn extract_skills(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    KNOWN_SKILLS
        .iter()
        .filter(|skill| contains_term(&lowered, skill))
        .map(|skill| skill.to_string())
        .collect()
}

/// Substring match that must not start or end inside a word,
/// so "java" does not match "javascript".
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, matched)| {
        let end = start + matched.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

pub fn extract_requirements(text: &str) -> JobRequirements {
    JobRequirements {
        title: extract_title(text),
        required_skills: extract_skills(text),
        required_experience_years: extract_experience_years(text).unwrap_or(0.0),
        ..Default::default()
    }
}

/// Requirement extraction without a language model.
pub struct HeuristicRequirementExtractor;

#[async_trait]
impl RequirementExtractor for HeuristicRequirementExtractor {
    async fn extract(&self, job_text: &str) -> Result<JobRequirements, AppError> {
        Ok(extract_requirements(job_text))
    }

    fn model_id(&self) -> &str {
        "template-based-analysis"
    }
}
