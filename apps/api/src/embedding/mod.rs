//! Embedding Provider: turns query text into a dense vector.
//!
//! `HttpEmbeddingProvider` talks to a JSON embedding endpoint;
//! `CachedEmbeddingProvider` wraps any provider with a TTL cache so repeated
//! queries within the hour skip the network call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::{content_key, TtlCache};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding endpoint returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("embedding endpoint returned an empty vector")]
    Empty,
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingRequest<'a> {
    input_text: &'a str,
    dimensions: usize,
}

/// Accepts both single-vector and batch-shaped responses.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Single { embedding: Vec<f32> },
    Batch { embeddings: Vec<Vec<f32>> },
}

impl EmbeddingResponse {
    fn into_vector(self) -> Vec<f32> {
        match self {
            EmbeddingResponse::Single { embedding } => embedding,
            EmbeddingResponse::Batch { embeddings } => {
                embeddings.into_iter().next().unwrap_or_default()
            }
        }
    }
}

/// Embedding model behind a JSON-over-HTTP endpoint.
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    dimensions: usize,
}

impl HttpEmbeddingProvider {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            api_key,
            dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            input_text: text,
            dimensions: self.dimensions,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let vector = response.json::<EmbeddingResponse>().await?.into_vector();
        if vector.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        info!("Generated embedding with {} dimensions", vector.len());
        Ok(vector)
    }
}

/// Caches another provider's vectors by normalized text.
pub struct CachedEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    cache: TtlCache<Vec<f32>>,
}

impl CachedEmbeddingProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &TtlCache<Vec<f32>> {
        &self.cache
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = content_key(text);
        if let Some(vector) = self.cache.get(&key) {
            debug!("Using cached embedding");
            return Ok(vector);
        }

        let vector = self.inner.embed(text).await?;
        self.cache.put(key, vector.clone());
        Ok(vector)
    }
}
