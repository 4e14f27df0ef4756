//! Search backend transport.
//!
//! `SearchBackend` is the seam between the retrieval engine and the index. The
//! production implementation speaks the OpenSearch `_search` REST API; tests
//! substitute in-memory backends.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::candidate::CandidateDocument;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("search backend unavailable: {0}")]
    Unavailable(String),
}

/// One scored hit as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: CandidateDocument,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitList {
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: HitList,
}

impl SearchResponse {
    /// Total matches reported by the backend; older servers send a bare number.
    pub fn total_matches(&self) -> u64 {
        match &self.hits.total {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(Value::Object(obj)) => obj.get("value").and_then(Value::as_u64).unwrap_or(0),
            _ => 0,
        }
    }
}

/// A ranked-retrieval backend holding the candidate index.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse, BackendError>;
}

/// OpenSearch (or Elasticsearch-compatible) REST client.
#[derive(Clone)]
pub struct OpenSearchClient {
    client: Client,
    endpoint: String,
    credentials: Option<(String, String)>,
}

impl OpenSearchClient {
    pub fn new(
        endpoint: String,
        credentials: Option<(String, String)>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
        })
    }
}

#[async_trait]
impl SearchBackend for OpenSearchClient {
    async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse, BackendError> {
        let url = format!("{}/{}/_search", self.endpoint, index);
        let mut request = self.client.post(&url).json(body);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&bytes)?;
        debug!(
            "Search on {index} returned {} hits ({} total)",
            parsed.hits.hits.len(),
            parsed.total_matches()
        );
        Ok(parsed)
    }
}
