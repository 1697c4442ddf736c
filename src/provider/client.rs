//! Thin HTTP client for OpenAI-compatible chat-completion endpoints.
//!
//! - `complete` posts a `ChatRequest` to `{base_url}/chat/completions` and
//!   returns `choices[0].message.content`.
//! - Non-2xx statuses become `AppError::Provider` with status and body.
//! - Envelopes without `choices[0].message` become `AppError::InvalidResponse`.
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::provider::types::{ChatRequest, ChatResponse};

/// One completion round-trip. The gateway only depends on this seam.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Model identifier stamped on outgoing requests.
    fn model(&self) -> &str;

    async fn complete(&self, request: &ChatRequest) -> AppResult<String>;
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        ChatClient { client: Client::new(), base_url: base, api_key, model }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(ChatClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatTransport for ChatClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<String> {
        let url = self.endpoint();
        tracing::info!(
            model = %request.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "Sending chat completion request to {}",
            url
        );
        if let Ok(body) = serde_json::to_string(request) {
            tracing::debug!(target: "provider", body = %body, "Request body");
        }

        let response = self.client.post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(AppError::HttpClient)?;

        let status = response.status();
        tracing::info!("Response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "Unable to read error body".to_string());
            let error_message = format!("{} - {}", status, error_body);
            tracing::error!("AI API error response: {}", error_message);
            return Err(AppError::Provider(error_message));
        }

        let raw = response.text().await.map_err(AppError::HttpClient)?;
        let envelope: ChatResponse = serde_json::from_str(&raw)
            .map_err(|e| AppError::InvalidResponse(format!("undecodable envelope: {}", e)))?;
        match envelope.first_content() {
            Some(content) => {
                tracing::debug!(target: "provider", content = %content, "Completion received");
                Ok(content.to_string())
            }
            None => Err(AppError::InvalidResponse("missing choices[0].message".to_string())),
        }
    }
}
