use std::sync::Arc;

use crate::analysis::CandidateAnalyzer;
use crate::profiles::ProfileStore;
use crate::ranking::engine::RankingEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the requirement and embedding caches shared by every request.
    pub ranking: Arc<RankingEngine>,
    pub profiles: Arc<dyn ProfileStore>,
    /// `None` when no model key is configured.
    pub analyzer: Option<Arc<CandidateAnalyzer>>,
}
