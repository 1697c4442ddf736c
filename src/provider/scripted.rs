//! In-memory transport that replays canned replies.
//!
//! Each call pops the next scripted reply; every request is recorded so tests
//! can assert on what was sent. An exhausted script behaves like an
//! unreachable provider.
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{AppError, AppResult};
use crate::provider::client::ChatTransport;
use crate::provider::types::ChatRequest;

#[derive(Debug)]
enum Reply {
    Content(String),
    Failure(String),
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue model text for the next call.
    pub fn reply(self, content: impl Into<String>) -> Self {
        self.push(Reply::Content(content.into()));
        self
    }

    /// Queue a provider failure for the next call.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Reply::Failure(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<String> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match next {
            Some(Reply::Content(text)) => Ok(text),
            Some(Reply::Failure(message)) => Err(AppError::Provider(message)),
            None => Err(AppError::Provider("no scripted reply left".to_string())),
        }
    }
}
