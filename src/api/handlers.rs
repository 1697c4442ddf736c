//! Axum request handlers for the HTTP API.
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::routes::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    BulkVariationRequest, BulkVariationResult, EvaluationRequest, EvaluationResult,
    UniquenessQuery, UniquenessResult, VariationRequest, VariationResult, MAX_BULK_TOTAL,
};

pub async fn root() -> &'static str {
    "LabQuest AI Gateway"
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.gateway.model(),
        "batchSize": state.gateway.batch_size(),
    }))
}

pub async fn generate_variations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VariationRequest>,
) -> Json<VariationResult> {
    tracing::info!(
        subject = %request.subject,
        count = request.variation_count(),
        "Generating question variations"
    );
    Json(state.gateway.generate_variations(&request).await)
}

pub async fn generate_bulk(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BulkVariationRequest>,
) -> AppResult<Json<BulkVariationResult>> {
    if payload.total == 0 || payload.total > MAX_BULK_TOTAL {
        return Err(AppError::Validation(format!(
            "total must be between 1 and {}, got {}",
            MAX_BULK_TOTAL, payload.total
        )));
    }
    tracing::info!(subject = %payload.request.subject, total = payload.total, "Generating bulk variations");
    Ok(Json(state.gateway.generate_bulk(&payload.request, payload.total).await))
}

pub async fn evaluate_answer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EvaluationRequest>,
) -> Json<EvaluationResult> {
    tracing::info!(subject = %request.subject, "Evaluating student answer");
    Json(state.gateway.evaluate_answer(&request).await)
}

pub async fn check_uniqueness(
    State(state): State<Arc<AppState>>,
    Json(query): Json<UniquenessQuery>,
) -> Json<UniquenessResult> {
    tracing::info!(questions = query.questions.len(), "Checking question uniqueness");
    Json(state.gateway.check_uniqueness(&query.questions).await)
}
