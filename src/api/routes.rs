//! Router and shared state for the HTTP service.
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::gateway::QuestionGateway;

pub struct AppState {
    pub gateway: QuestionGateway,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/variations", post(handlers::generate_variations))
        .route("/api/variations/bulk", post(handlers::generate_bulk))
        .route("/api/evaluations", post(handlers::evaluate_answer))
        .route("/api/uniqueness", post(handlers::check_uniqueness))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
