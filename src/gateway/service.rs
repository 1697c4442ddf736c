//! The public operations exposed to the UI layer.
//!
//! Each call builds a prompt, makes at most one transport call, and
//! interprets the reply. Any `AppError` along the way is logged and replaced
//! with fallback content flagged `degraded`, so none of these operations can
//! fail from the caller's point of view.
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{Config, DEFAULT_BATCH_SIZE};
use crate::error::AppResult;
use crate::gateway::{fallback, interpreter};
use crate::models::{
    BatchOutcome, BulkVariationResult, EvaluationRequest, EvaluationResult, UniquenessResult,
    VariationRequest, VariationResult, MAX_BULK_TOTAL, MAX_VARIATION_COUNT,
};
use crate::prompt::{ChatPrompt, PromptBuilder};
use crate::provider::client::{ChatClient, ChatTransport};
use crate::provider::types::ChatRequest;

#[derive(Clone)]
pub struct QuestionGateway {
    transport: Arc<dyn ChatTransport>,
    prompts: PromptBuilder,
    batch_size: u32,
}

impl QuestionGateway {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        QuestionGateway {
            transport,
            prompts: PromptBuilder::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Largest variation count sent in a single bulk batch, kept within
    /// `1..=MAX_VARIATION_COUNT`.
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_VARIATION_COUNT);
        self
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = ChatClient::from_config(config)?;
        Ok(Self::new(Arc::new(client)).with_batch_size(config.batch_size))
    }

    pub fn model(&self) -> &str {
        self.transport.model()
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    pub async fn generate_variations(&self, request: &VariationRequest) -> VariationResult {
        let span = tracing::info_span!("generate_variations", request_id = %Uuid::new_v4());
        match self.try_variations(request).instrument(span.clone()).await {
            Ok(result) => result,
            Err(e) => {
                span.in_scope(|| tracing::error!("Error generating question variations: {}", e));
                fallback::variations(request)
            }
        }
    }

    pub async fn evaluate_answer(&self, request: &EvaluationRequest) -> EvaluationResult {
        let span = tracing::info_span!("evaluate_answer", request_id = %Uuid::new_v4());
        match self.try_evaluation(request).instrument(span.clone()).await {
            Ok(result) => result,
            Err(e) => {
                span.in_scope(|| tracing::error!("Error evaluating answer: {}", e));
                fallback::evaluation()
            }
        }
    }

    /// Fewer than two questions are trivially unique and never reach the model.
    pub async fn check_uniqueness(&self, questions: &[String]) -> UniquenessResult {
        if questions.len() < 2 {
            return UniquenessResult { score: 100, degraded: false };
        }
        let span = tracing::info_span!("check_uniqueness", request_id = %Uuid::new_v4());
        match self.try_uniqueness(questions).instrument(span.clone()).await {
            Ok(score) => UniquenessResult { score, degraded: false },
            Err(e) => {
                span.in_scope(|| tracing::error!("Error checking uniqueness: {}", e));
                fallback::uniqueness()
            }
        }
    }

    /// Generate `total` variations as sequential batches of at most
    /// `batch_size`.
    ///
    /// A failed batch falls back on its own; earlier batches are kept. The
    /// concatenation is cut to `total`. If the model under-delivers, the
    /// result stays short and `shortfall` says by how much. At most
    /// `MAX_BULK_TOTAL` variations are generated; the rest count as shortfall.
    pub async fn generate_bulk(&self, request: &VariationRequest, total: u32) -> BulkVariationResult {
        let requested_total = total;
        let total = total.min(MAX_BULK_TOTAL);
        if total < requested_total {
            tracing::warn!(requested_total, cap = MAX_BULK_TOTAL, "Bulk total exceeds the cap");
        }
        let batch = self.batch_size.min(total).max(1);
        let batch_count = total.div_ceil(batch);
        tracing::info!(total, batch, batch_count, "Starting bulk variation generation");

        let mut variations: Vec<String> = Vec::new();
        let mut batches = Vec::new();

        for index in 0..batch_count {
            let remaining = total.saturating_sub(variations.len() as u32);
            if remaining == 0 {
                tracing::debug!("Collected {} variations after {} batches", variations.len(), index);
                break;
            }
            let requested = batch.min(remaining);
            let result = self.generate_variations(&request.with_count(requested)).await;
            batches.push(BatchOutcome {
                requested,
                received: result.variations.len() as u32,
                degraded: result.degraded,
            });
            variations.extend(result.variations);
        }

        variations.truncate(total as usize);
        let shortfall = requested_total - variations.len() as u32;
        if shortfall > 0 {
            tracing::warn!(total = requested_total, shortfall, "Bulk generation returned fewer variations than requested");
        }

        BulkVariationResult {
            variations,
            degraded: batches.iter().any(|b| b.degraded),
            batches,
            shortfall,
        }
    }

    async fn send(&self, prompt: ChatPrompt) -> AppResult<String> {
        let request = ChatRequest {
            model: self.transport.model().to_string(),
            messages: prompt.messages,
            temperature: prompt.params.temperature,
            max_tokens: prompt.params.max_tokens,
        };
        self.transport.complete(&request).await
    }

    async fn try_variations(&self, request: &VariationRequest) -> AppResult<VariationResult> {
        let raw = self.send(self.prompts.variations(request)).await?;
        let parsed = interpreter::parse_object(&raw)?;
        Ok(interpreter::interpret_variations(&parsed, request.variation_count()))
    }

    async fn try_evaluation(&self, request: &EvaluationRequest) -> AppResult<EvaluationResult> {
        let raw = self.send(self.prompts.evaluation(request)).await?;
        let parsed = interpreter::parse_object(&raw)?;
        Ok(interpreter::interpret_evaluation(&parsed))
    }

    async fn try_uniqueness(&self, questions: &[String]) -> AppResult<u8> {
        let raw = self.send(self.prompts.uniqueness(questions)).await?;
        interpreter::interpret_uniqueness(&raw)
    }
}
