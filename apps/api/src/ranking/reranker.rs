//! Reranker: fuses retrieval relevance with skill, position and experience
//! sub-scores into the final candidate order.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::matching::experience::match_experience;
use crate::matching::position::match_position;
use crate::matching::skills::{match_skills, SkillMatch};
use crate::models::requirements::{present, JobRequirements};
use crate::models::score::Score;
use crate::retrieval::{RetrievalHit, Strategy};

/// Relative weight of each signal in the final score. Weights sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightProfile {
    pub retrieval: f64,
    pub skill: f64,
    pub position: f64,
    pub experience: f64,
}

impl WeightProfile {
    /// Hybrid hits already carry a keyword signal in their retrieval score.
    pub const HYBRID: WeightProfile = WeightProfile {
        retrieval: 0.55,
        skill: 0.25,
        position: 0.10,
        experience: 0.10,
    };

    /// Vector-only hits lack the keyword signal, so skills weigh more.
    pub const VECTOR_ONLY: WeightProfile = WeightProfile {
        retrieval: 0.50,
        skill: 0.30,
        position: 0.10,
        experience: 0.10,
    };

    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Hybrid => Self::HYBRID,
            Strategy::VectorOnly => Self::VECTOR_ONLY,
        }
    }

    pub fn combine(
        &self,
        retrieval: Score,
        skill: Score,
        position: Score,
        experience: Score,
    ) -> Score {
        Score::new(
            retrieval.value() * self.retrieval
                + skill.value() * self.skill
                + position.value() * self.position
                + experience.value() * self.experience,
        )
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self::HYBRID
    }
}

/// A retrieval hit with every sub-score that went into its rank.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub hit: RetrievalHit,
    pub skill: SkillMatch,
    pub skill_score: Score,
    pub experience_score: Score,
    pub position_score: Score,
    pub rerank_score: Score,
}

/// Scores every hit against `requirements` and sorts best first.
///
/// `required_experience` is the effective requirement for this run, which may
/// exceed the extracted one. Ties keep the backend's original order.
pub fn rerank(
    hits: Vec<RetrievalHit>,
    requirements: &JobRequirements,
    required_experience: f64,
) -> Vec<RankedCandidate> {
    let title = present(&requirements.title).unwrap_or_default();

    let mut ranked: Vec<RankedCandidate> = hits
        .into_iter()
        .map(|hit| {
            let skill = match_skills(&requirements.required_skills, &hit.document.skills);
            let experience_score =
                match_experience(hit.document.total_experience_years, required_experience);
            let position_score = match_position(title, &hit.document.positions);
            let rerank_score = WeightProfile::for_strategy(hit.strategy).combine(
                hit.normalized_score,
                skill.score,
                position_score,
                experience_score,
            );
            debug!(
                "Reranked {}: raw={:.4} retrieval={} skill={} position={} experience={} final={}",
                hit.document.resume_id,
                hit.raw_score,
                hit.normalized_score,
                skill.score,
                position_score,
                experience_score,
                rerank_score
            );

            RankedCandidate {
                skill_score: skill.score,
                skill,
                experience_score,
                position_score,
                rerank_score,
                hit,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.rerank_score
            .partial_cmp(&a.rerank_score)
            .unwrap_or(Ordering::Equal)
            .then(a.hit.rank.cmp(&b.hit.rank))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateDocument;

    fn retrieval_hit(id: &str, normalized: f64, rank: usize, skills: &[&str]) -> RetrievalHit {
        RetrievalHit {
            document: CandidateDocument {
                resume_id: id.to_string(),
                skills: skills.iter().map(|s| s.to_string()).collect(),
                total_experience_years: 5.0,
                positions: vec!["Backend Engineer".to_string()],
                ..Default::default()
            },
            raw_score: normalized,
            normalized_score: Score::new(normalized),
            rank,
            strategy: Strategy::Hybrid,
        }
    }

    fn requirements() -> JobRequirements {
        JobRequirements {
            title: Some("Backend Engineer".to_string()),
            required_skills: vec!["rust".to_string(), "kafka".to_string()],
            required_experience_years: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_weight_profiles_sum_to_one() {
        for w in [WeightProfile::HYBRID, WeightProfile::VECTOR_ONLY] {
            let sum = w.retrieval + w.skill + w.position + w.experience;
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_combine_stays_in_range() {
        let inputs = [0.0, 0.5, 37.3, 99.99, 100.0, 250.0, -3.0, f64::NAN];
        for w in [WeightProfile::HYBRID, WeightProfile::VECTOR_ONLY] {
            for &a in &inputs {
                for &b in &inputs {
                    let (a, b) = (Score::new(a), Score::new(b));
                    let score = w.combine(a, b, a, b);
                    assert!((0.0..=100.0).contains(&score.value()), "{a} {b} -> {score}");
                }
            }
        }
        let all_max = WeightProfile::HYBRID.combine(Score::MAX, Score::MAX, Score::MAX, Score::MAX);
        assert_eq!(all_max.value(), 100.0);
    }

    #[test]
    fn test_hybrid_weights_applied() {
        // 80*0.55 + 50*0.25 + 100*0.10 + 60*0.10
        let score = WeightProfile::HYBRID.combine(
            Score::new(80.0),
            Score::new(50.0),
            Score::new(100.0),
            Score::new(60.0),
        );
        assert_eq!(score.value(), 72.5);
    }

    #[test]
    fn test_vector_only_hits_use_fallback_profile() {
        let mut hit = retrieval_hit("v", 80.0, 0, &["rust"]);
        hit.strategy = Strategy::VectorOnly;
        let ranked = rerank(vec![hit], &requirements(), 5.0);
        // 80*0.50 + 50*0.30 + 100*0.10 + 100*0.10
        assert_eq!(ranked[0].rerank_score.value(), 75.0);
    }

    #[test]
    fn test_skills_can_outrank_retrieval() {
        let hits = vec![
            retrieval_hit("close-text", 60.0, 0, &[]),
            retrieval_hit("skilled", 55.0, 1, &["Rust", "Kafka"]),
        ];
        let ranked = rerank(hits, &requirements(), 5.0);
        assert_eq!(ranked[0].hit.document.resume_id, "skilled");
        assert_eq!(ranked[0].skill_score.value(), 100.0);
        assert_eq!(ranked[0].position_score.value(), 100.0);
        assert_eq!(ranked[0].experience_score.value(), 100.0);
    }

    #[test]
    fn test_ties_broken_by_retrieval_rank() {
        let hits = vec![
            retrieval_hit("third", 50.0, 2, &["rust"]),
            retrieval_hit("first", 50.0, 0, &["rust"]),
            retrieval_hit("second", 50.0, 1, &["rust"]),
        ];
        let ranked = rerank(hits, &requirements(), 5.0);
        let ids: Vec<&str> = ranked
            .iter()
            .map(|r| r.hit.document.resume_id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_title_gives_zero_position_score() {
        let req = JobRequirements {
            title: None,
            ..requirements()
        };
        let ranked = rerank(vec![retrieval_hit("a", 50.0, 0, &[])], &req, 0.0);
        assert_eq!(ranked[0].position_score, Score::ZERO);
        assert_eq!(ranked[0].experience_score, Score::ZERO);
    }
}
