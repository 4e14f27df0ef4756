pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::profiles::handlers as profiles;
use crate::ranking::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route(
            "/api/v1/match",
            get(handlers::handle_match_query).post(handlers::handle_match),
        )
        // Profiles
        .route("/api/v1/profiles/:resume_id", get(profiles::handle_get_profile))
        // Candidate analysis
        .route("/api/v1/analysis", post(analysis::handle_analysis))
        .with_state(state)
}
