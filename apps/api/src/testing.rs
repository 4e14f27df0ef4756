//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::TextGenerator;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::errors::AppError;
use crate::llm_client::{GenerationParams, LlmError};
use crate::models::candidate::CandidateDocument;
use crate::models::profile::{Profile, ProfileRow};
use crate::models::requirements::JobRequirements;
use crate::profiles::{ProfileStore, ProfileStoreError};
use crate::requirements::heuristic::extract_requirements;
use crate::requirements::RequirementExtractor;
use crate::retrieval::backend::{BackendError, HitList, RawHit, SearchBackend, SearchResponse};
use crate::retrieval::Strategy;

pub fn hit(id: &str, score: f64, experience: f64) -> RawHit {
    candidate_hit(id, score, experience, &[])
}

pub fn candidate_hit(id: &str, score: f64, experience: f64, skills: &[&str]) -> RawHit {
    RawHit {
        id: None,
        score: Some(score),
        source: CandidateDocument {
            resume_id: id.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            total_experience_years: experience,
            ..Default::default()
        },
    }
}

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Hits(Vec<RawHit>),
    Fail,
}

/// Answers each search with the next scripted reply, failing once the script
/// runs out.
pub struct ScriptedBackend {
    replies: Mutex<Vec<ScriptedReply>>,
    seen: Mutex<Vec<Strategy>>,
}

impl ScriptedBackend {
    pub fn new(mut replies: Vec<ScriptedReply>) -> Self {
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Strategy of every request received, in order.
    pub fn strategies_seen(&self) -> Vec<Strategy> {
        self.seen.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, _index: &str, body: &Value) -> Result<SearchResponse, BackendError> {
        let strategy = if body["query"].get("bool").is_some() {
            Strategy::Hybrid
        } else {
            Strategy::VectorOnly
        };
        self.seen.lock().push(strategy);

        match self.replies.lock().pop() {
            Some(ScriptedReply::Hits(hits)) => Ok(SearchResponse {
                hits: HitList {
                    total: Some(Value::from(hits.len())),
                    hits,
                },
            }),
            Some(ScriptedReply::Fail) => Err(BackendError::Status {
                status: 503,
                body: "scripted failure".to_string(),
            }),
            None => Err(BackendError::Unavailable("script exhausted".to_string())),
        }
    }
}

/// Deterministic embedder that counts how often it is called.
#[derive(Default)]
pub struct CountingEmbedder {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingEmbedder {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbeddingError::Empty);
        }
        Ok(vec![text.len() as f32, 1.0, 0.5])
    }
}

/// Pattern-based extractor that counts how often it is called.
#[derive(Default)]
pub struct CountingExtractor {
    calls: AtomicUsize,
}

impl CountingExtractor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequirementExtractor for CountingExtractor {
    async fn extract(&self, job_text: &str) -> Result<JobRequirements, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(extract_requirements(job_text))
    }

    fn model_id(&self) -> &str {
        "counting"
    }
}

#[derive(Default)]
pub struct MapProfileStore {
    profiles: HashMap<String, Profile>,
    rows: HashMap<Uuid, ProfileRow>,
}

impl MapProfileStore {
    pub fn with(profiles: impl IntoIterator<Item = (String, Profile)>) -> Self {
        Self {
            profiles: profiles.into_iter().collect(),
            rows: HashMap::new(),
        }
    }

    /// Store serving single-row lookups; ids must be UUIDs.
    pub fn with_rows(rows: impl IntoIterator<Item = ProfileRow>) -> Self {
        Self {
            profiles: HashMap::new(),
            rows: rows
                .into_iter()
                .filter_map(|row| Some((Uuid::parse_str(&row.resume_id).ok()?, row)))
                .collect(),
        }
    }
}

pub fn profile_row(resume_id: &str, name: &str) -> ProfileRow {
    ProfileRow {
        resume_id: resume_id.to_string(),
        name: Some(name.to_string()),
        email: Some(format!("{}@example.org", name.to_lowercase())),
        phone_number: None,
        address: None,
        linkedin_url: None,
        s3_bucket: Some("resume-documents".to_string()),
        s3_key: Some(format!("processed/resumes/{resume_id}.pdf")),
        original_filename: Some("cv.pdf".to_string()),
        file_type: Some("pdf".to_string()),
    }
}

#[async_trait]
impl ProfileStore for MapProfileStore {
    async fn lookup(&self, ids: &[String]) -> Result<HashMap<String, Profile>, ProfileStoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.profiles.get(id).map(|p| (id.clone(), p.clone())))
            .collect())
    }

    async fn find(&self, resume_id: Uuid) -> Result<Option<ProfileRow>, ProfileStoreError> {
        Ok(self.rows.get(&resume_id).cloned())
    }
}

pub struct FailingProfileStore;

#[async_trait]
impl ProfileStore for FailingProfileStore {
    async fn lookup(&self, _ids: &[String]) -> Result<HashMap<String, Profile>, ProfileStoreError> {
        Err(ProfileStoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find(&self, _resume_id: Uuid) -> Result<Option<ProfileRow>, ProfileStoreError> {
        Err(ProfileStoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Returns a fixed reply, or fails every call, recording the prompts it saw.
pub struct ScriptedGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _system: &str,
        _params: GenerationParams,
    ) -> Result<String, LlmError> {
        self.prompts.lock().push(prompt.to_string());
        self.reply.clone().ok_or(LlmError::Api {
            status: 529,
            message: "scripted overload".to_string(),
        })
    }

    fn model_id(&self) -> &str {
        "scripted-generator"
    }
}
