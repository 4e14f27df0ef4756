//! Requirement Extractor: turns job text into `JobRequirements`.
//!
//! Extraction is expensive (a language model call), so the extractor used by
//! the ranking engine is wrapped in `CachedRequirementExtractor`, keyed by the
//! normalized job text.

pub mod heuristic;
pub mod llm;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{content_key, TtlCache};
use crate::errors::AppError;
use crate::models::requirements::JobRequirements;

#[async_trait]
pub trait RequirementExtractor: Send + Sync {
    async fn extract(&self, job_text: &str) -> Result<JobRequirements, AppError>;

    /// Identifier of the model doing the extraction, reported in response metadata.
    fn model_id(&self) -> &str;
}

pub struct CachedRequirementExtractor {
    inner: Arc<dyn RequirementExtractor>,
    cache: TtlCache<JobRequirements>,
}

impl CachedRequirementExtractor {
    pub fn new(inner: Arc<dyn RequirementExtractor>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &TtlCache<JobRequirements> {
        &self.cache
    }
}

#[async_trait]
impl RequirementExtractor for CachedRequirementExtractor {
    async fn extract(&self, job_text: &str) -> Result<JobRequirements, AppError> {
        let key = content_key(job_text);
        if let Some(requirements) = self.cache.get(&key) {
            debug!("Using cached requirement analysis");
            return Ok(requirements);
        }

        let requirements = self.inner.extract(job_text).await?;
        self.cache.put(key, requirements.clone());
        Ok(requirements)
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
