#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use labquest_gateway::api::{create_router, AppState};
use labquest_gateway::models::{Difficulty, EvaluationRequest, VariationRequest};
use labquest_gateway::provider::ScriptedTransport;
use labquest_gateway::QuestionGateway;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn osmosis(count: Option<u32>) -> VariationRequest {
    VariationRequest {
        original_question: "What is osmosis?".into(),
        subject: "Biology".into(),
        difficulty: Difficulty::Medium,
        category: "Cell transport".into(),
        tags: vec!["membranes".into(), "diffusion".into()],
        variation_count: count,
    }
}

pub fn osmosis_answer() -> EvaluationRequest {
    EvaluationRequest {
        question: "What is osmosis?".into(),
        student_answer: "Osmosis is water moving through a semi-permeable membrane toward higher solute concentration.".into(),
        subject: "Biology".into(),
    }
}

pub fn gateway(transport: &ScriptedTransport) -> QuestionGateway {
    init_tracing();
    QuestionGateway::new(Arc::new(transport.clone()))
}

pub fn test_app(transport: &ScriptedTransport) -> Router {
    create_router(Arc::new(AppState { gateway: gateway(transport) }))
}

/// The user message of a recorded request.
pub fn user_prompt(request: &labquest_gateway::provider::types::ChatRequest) -> &str {
    &request.messages[1].content
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
