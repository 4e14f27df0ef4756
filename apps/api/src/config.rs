use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::{EMBEDDING_TTL, REQUIREMENTS_TTL};
use crate::retrieval::{FALLBACK_STEEPNESS, HYBRID_STEEPNESS};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a number is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub opensearch_endpoint: String,
    pub opensearch_index: String,
    /// Basic-auth credentials; both variables or neither.
    pub opensearch_credentials: Option<(String, String)>,
    pub search_timeout: Duration,
    pub embedding_endpoint: String,
    pub embedding_api_key: Option<String>,
    pub embedding_dimensions: usize,
    /// Without a key, requirements are extracted by pattern matching.
    pub anthropic_api_key: Option<String>,
    /// Without a database, every profile is synthesized.
    pub database_url: Option<String>,
    pub resume_bucket: String,
    pub embedding_cache_ttl: Duration,
    pub requirements_cache_ttl: Duration,
    pub hybrid_score_steepness: f64,
    pub fallback_score_steepness: f64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let opensearch_credentials = match (
            optional_env("OPENSEARCH_USERNAME"),
            optional_env("OPENSEARCH_PASSWORD"),
        ) {
            (Some(user), Some(password)) => Some((user, password)),
            (None, None) => None,
            _ => anyhow::bail!(
                "OPENSEARCH_USERNAME and OPENSEARCH_PASSWORD must be set together"
            ),
        };

        Ok(Config {
            opensearch_endpoint: require_env("OPENSEARCH_ENDPOINT")?
                .trim_end_matches('/')
                .to_string(),
            opensearch_index: optional_env("OPENSEARCH_INDEX")
                .unwrap_or_else(|| "resume-embeddings".to_string()),
            opensearch_credentials,
            search_timeout: Duration::from_secs(parse_env("SEARCH_TIMEOUT_SECS", 30)?),
            embedding_endpoint: require_env("EMBEDDING_ENDPOINT")?,
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_dimensions: parse_env("EMBEDDING_DIMENSIONS", 1024)?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            database_url: optional_env("DATABASE_URL"),
            resume_bucket: optional_env("RESUME_BUCKET")
                .unwrap_or_else(|| "resume-documents".to_string()),
            embedding_cache_ttl: Duration::from_secs(parse_env(
                "EMBEDDING_CACHE_TTL_SECS",
                EMBEDDING_TTL.as_secs(),
            )?),
            requirements_cache_ttl: Duration::from_secs(parse_env(
                "REQUIREMENTS_CACHE_TTL_SECS",
                REQUIREMENTS_TTL.as_secs(),
            )?),
            hybrid_score_steepness: parse_env("HYBRID_SCORE_STEEPNESS", HYBRID_STEEPNESS)?,
            fallback_score_steepness: parse_env("FALLBACK_SCORE_STEEPNESS", FALLBACK_STEEPNESS)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'"))
}
