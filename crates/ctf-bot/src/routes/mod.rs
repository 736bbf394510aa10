//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, interactions};
use crate::state::AppState;

/// Interactions endpoint (rate limited)
pub fn create_router() -> Router<AppState> {
    Router::new().route("/interactions", post(interactions::handle_interaction))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
