//! Ranking Engine: one ranking run from job text to assembled response.
//!
//! The run is a sequential pipeline:
//! requirement extraction → focused query → embedding → retrieval → rerank →
//! truncate and enrich. Extraction and embedding are fatal on failure;
//! retrieval degrades through its strategy chain and profile enrichment
//! degrades to placeholders. Degradation shows up only in the metadata.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::cache::CacheStats;
use crate::embedding::{CachedEmbeddingProvider, EmbeddingProvider};
use crate::errors::AppError;
use crate::models::requirements::JobRequirements;
use crate::models::score::round_to;
use crate::profiles::ProfileStore;
use crate::ranking::assembler::{assemble, skill_gap_analysis, MatchResult, ProfileReport, SkillGap};
use crate::ranking::reranker::rerank;
use crate::requirements::{CachedRequirementExtractor, RequirementExtractor};
use crate::retrieval::query::compose_focused_query;
use crate::retrieval::{RetrievalEngine, RetrievalRequest, Strategy, StrategyAttempt};

/// A validated ranking request.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub job_description: String,
    /// In `[1, 100]`.
    pub max_results: usize,
    /// Finite and `>= 0`.
    pub min_experience: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct JobInfo {
    pub title: String,
    pub required_experience: f64,
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievalReport {
    /// Strategy that served the results.
    pub strategy: Strategy,
    pub total_matches: u64,
    pub attempts: Vec<StrategyAttempt>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub requirements: CacheStats,
    pub embeddings: CacheStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct Performance {
    pub total_duration_ms: u64,
    pub candidates_per_second: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessingMetadata {
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub model_id: String,
    pub analyzed_candidates_count: usize,
    pub retrieval: RetrievalReport,
    pub profiles: ProfileReport,
    pub caches: CacheReport,
    pub performance: Performance,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub message: String,
    pub total_results: usize,
    pub job_info: JobInfo,
    pub skill_gap_analysis: Vec<SkillGap>,
    pub processing_metadata: ProcessingMetadata,
    pub results: Vec<MatchResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Owns the requirement and embedding caches shared by every run.
pub struct RankingEngine {
    extractor: Arc<CachedRequirementExtractor>,
    embedder: Arc<CachedEmbeddingProvider>,
    retrieval: RetrievalEngine,
    profiles: Arc<dyn ProfileStore>,
    resume_bucket: String,
}

impl RankingEngine {
    pub fn new(
        extractor: Arc<CachedRequirementExtractor>,
        embedder: Arc<CachedEmbeddingProvider>,
        retrieval: RetrievalEngine,
        profiles: Arc<dyn ProfileStore>,
        resume_bucket: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            embedder,
            retrieval,
            profiles,
            resume_bucket: resume_bucket.into(),
        }
    }

    pub fn index(&self) -> &str {
        self.retrieval.index()
    }

    pub fn model_id(&self) -> &str {
        self.extractor.model_id()
    }

    pub async fn rank(&self, query: &MatchQuery) -> Result<MatchResponse, AppError> {
        let started = Instant::now();

        let requirements = self.extractor.extract(&query.job_description).await?;
        let required_experience = effective_experience(&requirements, query.min_experience);
        info!(
            "Ranking for '{}' with {} required skills, {} years required",
            requirements.display_title(),
            requirements.required_skills.len(),
            required_experience
        );

        let focused_query = compose_focused_query(&query.job_description, &requirements);
        let embedding = self.embedder.embed(&focused_query).await?;

        let retrieved = self
            .retrieval
            .retrieve(&RetrievalRequest {
                focused_query: &focused_query,
                embedding: &embedding,
                required_skills: &requirements.required_skills,
                max_results: query.max_results,
                min_experience: query.min_experience,
            })
            .await?;

        let ranked = rerank(retrieved.hits, &requirements, required_experience);
        let (results, profiles) = assemble(
            ranked,
            query.max_results,
            required_experience,
            self.profiles.as_ref(),
            &self.resume_bucket,
        )
        .await;
        let skill_gap_analysis = skill_gap_analysis(&results);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let candidates_per_second = if elapsed_ms > 0 {
            round_to(results.len() as f64 / (elapsed_ms as f64 / 1000.0), 2)
        } else {
            0.0
        };
        info!(
            "Ranked {} candidates via {} retrieval in {}ms",
            results.len(),
            retrieved.strategy.as_str(),
            elapsed_ms
        );

        Ok(MatchResponse {
            message: "Successfully matched resumes".to_string(),
            total_results: results.len(),
            job_info: JobInfo {
                title: requirements.display_title().to_string(),
                required_experience,
                required_skills: requirements.required_skills.clone(),
            },
            skill_gap_analysis,
            processing_metadata: ProcessingMetadata {
                timestamp: Utc::now(),
                processing_time_ms: elapsed_ms,
                model_id: self.model_id().to_string(),
                analyzed_candidates_count: results.len(),
                retrieval: RetrievalReport {
                    strategy: retrieved.strategy,
                    total_matches: retrieved.total_matches,
                    attempts: retrieved.attempts,
                },
                profiles,
                caches: CacheReport {
                    requirements: self.extractor.cache().stats(),
                    embeddings: self.embedder.cache().stats(),
                },
                performance: Performance {
                    total_duration_ms: elapsed_ms,
                    candidates_per_second,
                },
            },
            results,
        })
    }
}

/// The stricter of the extracted requirement and the caller's minimum.
fn effective_experience(requirements: &JobRequirements, min_experience: f64) -> f64 {
    requirements.required_experience_years.max(min_experience).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::requirements::heuristic::HeuristicRequirementExtractor;
    use crate::retrieval::RetrievalSettings;
    use crate::testing::{
        candidate_hit, CountingEmbedder, FailingProfileStore, MapProfileStore, ScriptedBackend,
        ScriptedReply,
    };

    const JOB: &str = "Senior Python Engineer, 5 years experience, skills: python, aws, docker";

    fn engine(backend: Arc<ScriptedBackend>, profiles: Arc<dyn ProfileStore>) -> RankingEngine {
        RankingEngine::new(
            Arc::new(CachedRequirementExtractor::new(
                Arc::new(HeuristicRequirementExtractor),
                Duration::from_secs(86_400),
            )),
            Arc::new(CachedEmbeddingProvider::new(
                Arc::new(CountingEmbedder::default()),
                Duration::from_secs(3600),
            )),
            RetrievalEngine::new(backend, RetrievalSettings::new("resume-embeddings")),
            profiles,
            "resume-documents",
        )
    }

    fn query(max_results: usize, min_experience: f64) -> MatchQuery {
        MatchQuery {
            job_description: JOB.to_string(),
            max_results,
            min_experience,
        }
    }

    fn two_candidates() -> Arc<ScriptedBackend> {
        Arc::new(ScriptedBackend::new(vec![ScriptedReply::Hits(vec![
            candidate_hit("candidate-b", 5.0, 2.0, &["Python3"]),
            candidate_hit("candidate-a", 9.0, 6.0, &["python", "aws", "docker"]),
        ])]))
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_ranks_full_skill_match_first() {
        let engine = engine(two_candidates(), Arc::new(MapProfileStore::default()));
        let response = engine.rank(&query(30, 0.0)).await.unwrap();

        assert_eq!(response.total_results, 2);
        let a = &response.results[0];
        let b = &response.results[1];
        assert_eq!(a.resume_id, "candidate-a");
        assert_eq!(b.resume_id, "candidate-b");
        assert!(a.scores.overall > b.scores.overall);

        assert_eq!(a.scores.skill_match.value(), 100.0);
        assert!(b.scores.skill_match.value() > 0.0);
        assert!(b.scores.skill_match.value() < 100.0);
        assert_eq!(b.skills.partial_matches.len(), 1);

        assert_eq!(response.job_info.required_skills, vec!["python", "aws", "docker"]);
        assert_eq!(response.job_info.required_experience, 5.0);
        assert_eq!(a.experience.difference, 1.0);
        assert_eq!(b.experience.difference, -3.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metadata_reports_strategy_and_profiles() {
        let engine = engine(two_candidates(), Arc::new(FailingProfileStore));
        let response = engine.rank(&query(1, 0.0)).await.unwrap();

        let meta = &response.processing_metadata;
        assert_eq!(meta.model_id, "template-based-analysis");
        assert_eq!(meta.retrieval.strategy, Strategy::Hybrid);
        assert_eq!(meta.analyzed_candidates_count, 1);
        assert_eq!(meta.profiles.synthesized, 1);
        assert!(meta.profiles.store_error.is_some());

        // the single result has every required skill
        assert!(response.skill_gap_analysis.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_experience_raises_requirement_and_floors_hits() {
        let engine = engine(two_candidates(), Arc::new(MapProfileStore::default()));
        let response = engine.rank(&query(30, 6.0)).await.unwrap();

        assert_eq!(response.total_results, 1);
        assert_eq!(response.job_info.required_experience, 6.0);
        assert_eq!(response.results[0].scores.experience_match.value(), 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_run_served_from_caches() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            ScriptedReply::Hits(vec![candidate_hit("a", 1.0, 1.0, &["python"])]),
            ScriptedReply::Hits(vec![candidate_hit("a", 1.0, 1.0, &["python"])]),
        ]));
        let engine = engine(backend, Arc::new(MapProfileStore::default()));
        engine.rank(&query(10, 0.0)).await.unwrap();
        let second = engine.rank(&query(10, 0.0)).await.unwrap();

        let caches = &second.processing_metadata.caches;
        assert_eq!(caches.requirements.hits, 1);
        assert_eq!(caches.requirements.entries, 1);
        assert_eq!(caches.embeddings.hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_hits_anywhere_is_an_empty_success() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            ScriptedReply::Hits(vec![]),
            ScriptedReply::Hits(vec![]),
        ]));
        let engine = engine(backend, Arc::new(MapProfileStore::default()));
        let response = engine.rank(&query(10, 0.0)).await.unwrap();

        assert_eq!(response.total_results, 0);
        assert!(response.skill_gap_analysis.is_empty());
        assert_eq!(response.processing_metadata.retrieval.strategy, Strategy::VectorOnly);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_down_is_a_retrieval_error() {
        let backend = Arc::new(ScriptedBackend::new(vec![ScriptedReply::Fail; 6]));
        let engine = engine(backend, Arc::new(MapProfileStore::default()));
        let err = engine.rank(&query(10, 0.0)).await.unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
    }

    #[test]
    fn test_effective_experience_takes_the_larger() {
        let req = JobRequirements {
            required_experience_years: 3.0,
            ..Default::default()
        };
        assert_eq!(effective_experience(&req, 0.0), 3.0);
        assert_eq!(effective_experience(&req, 4.5), 4.5);
    }
}
