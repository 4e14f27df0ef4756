//! Retrieval Engine: fetches candidate hits for a focused query.
//!
//! Retrieval runs an ordered chain of strategies. Each strategy gets its own
//! bounded retry budget and ends in one of three outcomes:
//! - `Success`: hits came back; the chain stops and they are scored.
//! - `EmptyResult`: the backend answered with nothing; try the next strategy.
//! - `TransportFailure`: every attempt failed; try the next strategy.
//!
//! If the last strategy fails in transport the run fails. If it comes back
//! empty the run succeeds with no hits. Nothing is ever fabricated.

pub mod backend;
pub mod query;
pub mod scores;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::candidate::CandidateDocument;
use crate::models::score::Score;
use crate::retrieval::backend::{BackendError, RawHit, SearchBackend, SearchResponse};
use crate::retrieval::query::{hybrid_query, initial_size, vector_query};
use crate::retrieval::scores::normalize_scores;
use crate::retry::RetryPolicy;

/// Logistic steepness for hybrid scores.
pub const HYBRID_STEEPNESS: f64 = 12.0;
/// Logistic steepness for vector-only scores. Overridable via configuration.
pub const FALLBACK_STEEPNESS: f64 = 10.0;

/// A named way of querying the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// kNN + fuzzy keyword + skill phrase boosts.
    Hybrid,
    /// kNN only.
    VectorOnly,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Hybrid => "hybrid",
            Strategy::VectorOnly => "vector_only",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    pub index: String,
    pub chain: Vec<Strategy>,
    pub retry: RetryPolicy,
    pub hybrid_steepness: f64,
    pub fallback_steepness: f64,
}

impl RetrievalSettings {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            chain: vec![Strategy::Hybrid, Strategy::VectorOnly],
            retry: RetryPolicy::default(),
            hybrid_steepness: HYBRID_STEEPNESS,
            fallback_steepness: FALLBACK_STEEPNESS,
        }
    }

    fn steepness(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Hybrid => self.hybrid_steepness,
            Strategy::VectorOnly => self.fallback_steepness,
        }
    }
}

/// Inputs to one retrieval run.
#[derive(Debug, Clone, Copy)]
pub struct RetrievalRequest<'a> {
    pub focused_query: &'a str,
    pub embedding: &'a [f32],
    pub required_skills: &'a [String],
    pub max_results: usize,
    /// Hits below this many years are dropped when positive.
    pub min_experience: f64,
}

/// A candidate document with its retrieval relevance.
#[derive(Debug, Clone)]
pub struct RetrievalHit {
    pub document: CandidateDocument,
    pub raw_score: f64,
    pub normalized_score: Score,
    /// Position in the backend's own ordering, before any filtering.
    pub rank: usize,
    pub strategy: Strategy,
}

enum StrategyOutcome {
    Success(SearchResponse),
    EmptyResult,
    TransportFailure(BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    EmptyResult,
    TransportFailure,
}

/// What happened to one strategy during a run.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAttempt {
    pub strategy: Strategy,
    pub attempts: u32,
    pub outcome: OutcomeKind,
    /// Backoff waits actually slept between attempts.
    pub waits_ms: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RetrievalOutcome {
    pub hits: Vec<RetrievalHit>,
    /// Strategy that served the request.
    pub strategy: Strategy,
    pub attempts: Vec<StrategyAttempt>,
    pub total_matches: u64,
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("all retrieval strategies failed; last error: {last_error}")]
    Exhausted {
        attempts: Vec<StrategyAttempt>,
        last_error: String,
    },
}

/// Runs the strategy chain against a search backend.
#[derive(Clone)]
pub struct RetrievalEngine {
    backend: Arc<dyn SearchBackend>,
    settings: RetrievalSettings,
}

impl RetrievalEngine {
    pub fn new(backend: Arc<dyn SearchBackend>, settings: RetrievalSettings) -> Self {
        Self { backend, settings }
    }

    /// Index every strategy searches.
    pub fn index(&self) -> &str {
        &self.settings.index
    }

    pub async fn retrieve(
        &self,
        request: &RetrievalRequest<'_>,
    ) -> Result<RetrievalOutcome, RetrievalError> {
        let size = initial_size(request.max_results);
        let mut attempts = Vec::with_capacity(self.settings.chain.len());
        let mut last_error = String::from("no retrieval strategy configured");
        let mut served_empty = None;

        for (position, &strategy) in self.settings.chain.iter().enumerate() {
            if position > 0 {
                info!("Falling back to {} retrieval", strategy.as_str());
            }

            let body = match strategy {
                Strategy::Hybrid => hybrid_query(
                    request.focused_query,
                    request.embedding,
                    request.required_skills,
                    size,
                ),
                Strategy::VectorOnly => vector_query(request.embedding, size),
            };

            let (outcome, attempt) = self.run_with_retry(strategy, &body).await;
            attempts.push(attempt);

            match outcome {
                StrategyOutcome::Success(response) => {
                    let total_matches = response.total_matches();
                    let hits =
                        self.score_hits(strategy, response.hits.hits, request.min_experience);
                    info!(
                        "{} retrieval served {} hits ({} total matches)",
                        strategy.as_str(),
                        hits.len(),
                        total_matches
                    );
                    return Ok(RetrievalOutcome {
                        hits,
                        strategy,
                        attempts,
                        total_matches,
                    });
                }
                StrategyOutcome::EmptyResult => {
                    warn!("{} retrieval returned no hits", strategy.as_str());
                    served_empty = Some(strategy);
                }
                StrategyOutcome::TransportFailure(e) => {
                    error!("{} retrieval failed: {e}", strategy.as_str());
                    last_error = e.to_string();
                    served_empty = None;
                }
            }
        }

        match served_empty {
            Some(strategy) => Ok(RetrievalOutcome {
                hits: Vec::new(),
                strategy,
                attempts,
                total_matches: 0,
            }),
            None => Err(RetrievalError::Exhausted {
                attempts,
                last_error,
            }),
        }
    }

    /// Runs one strategy under the retry policy. Waits block this request only.
    async fn run_with_retry(
        &self,
        strategy: Strategy,
        body: &serde_json::Value,
    ) -> (StrategyOutcome, StrategyAttempt) {
        let policy = self.settings.retry;
        let mut waits_ms = Vec::new();
        let mut attempts = 0;
        let mut last_error = None;

        for attempt in 0..policy.max_attempts {
            attempts += 1;
            info!(
                "{} search attempt {}/{}",
                strategy.as_str(),
                attempt + 1,
                policy.max_attempts
            );

            match self.backend.search(&self.settings.index, body).await {
                Ok(response) if response.hits.hits.is_empty() => {
                    return (
                        StrategyOutcome::EmptyResult,
                        StrategyAttempt {
                            strategy,
                            attempts,
                            outcome: OutcomeKind::EmptyResult,
                            waits_ms,
                            error: None,
                        },
                    );
                }
                Ok(response) => {
                    return (
                        StrategyOutcome::Success(response),
                        StrategyAttempt {
                            strategy,
                            attempts,
                            outcome: OutcomeKind::Success,
                            waits_ms,
                            error: None,
                        },
                    );
                }
                Err(e) => {
                    warn!(
                        "{} search attempt {} failed: {e}",
                        strategy.as_str(),
                        attempt + 1
                    );
                    last_error = Some(e);
                    if attempt + 1 < policy.max_attempts {
                        let wait = policy.backoff(attempt);
                        warn!("Retrying in {:.2}s", wait.as_secs_f64());
                        waits_ms.push(wait.as_millis() as u64);
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| BackendError::Unavailable("no attempts were made".to_string()));
        let attempt = StrategyAttempt {
            strategy,
            attempts,
            outcome: OutcomeKind::TransportFailure,
            waits_ms,
            error: Some(error.to_string()),
        };
        (StrategyOutcome::TransportFailure(error), attempt)
    }

    /// Normalizes over the whole batch, then applies the experience floor.
    fn score_hits(
        &self,
        strategy: Strategy,
        raw_hits: Vec<RawHit>,
        min_experience: f64,
    ) -> Vec<RetrievalHit> {
        let raw_scores: Vec<f64> = raw_hits.iter().map(|h| h.score.unwrap_or(0.0)).collect();
        let normalized = normalize_scores(&raw_scores, self.settings.steepness(strategy));

        raw_hits
            .into_iter()
            .zip(normalized)
            .enumerate()
            .filter(|(_, (hit, _))| {
                min_experience <= 0.0 || hit.source.total_experience_years >= min_experience
            })
            .map(|(rank, (hit, normalized_score))| {
                let mut document = hit.source;
                if document.resume_id.is_empty() {
                    document.resume_id = hit.id.unwrap_or_default();
                }
                RetrievalHit {
                    document,
                    raw_score: hit.score.unwrap_or(0.0),
                    normalized_score,
                    rank,
                    strategy,
                }
            })
            .collect()
    }
}
