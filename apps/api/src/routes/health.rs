use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
///
/// Liveness plus the wiring this instance serves with: search index,
/// requirement model, and which optional collaborators are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let profile_store = if state.profiles.is_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    Json(json!({
        "status": "ok",
        "service": "resume-matcher",
        "version": env!("CARGO_PKG_VERSION"),
        "index": state.ranking.index(),
        "requirements_model": state.ranking.model_id(),
        "profile_store": profile_store,
        "analysis": state.analyzer.is_some(),
    }))
}
