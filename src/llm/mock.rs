//! Scripted `LlmJson` for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use super::types::{JsonResponse, LlmError, LlmJson};

pub struct MockLlm {
    replies: Mutex<VecDeque<Result<JsonResponse, LlmError>>>,
    prompts: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl MockLlm {
    /// Replies with each text in order, then `{}`.
    pub fn replying(texts: &[&str]) -> Self {
        Self::scripted(texts.iter().map(|t| Ok(text_response(t))).collect())
    }

    pub fn failing(err: LlmError) -> Self {
        Self::scripted(vec![Err(err)])
    }

    pub fn scripted(replies: Vec<Result<JsonResponse, LlmError>>) -> Self {
        Self { replies: Mutex::new(replies.into()), prompts: Mutex::new(Vec::new()), gate: None }
    }

    /// Hold every call until `gate` is notified.
    #[must_use]
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

pub fn text_response(text: &str) -> JsonResponse {
    JsonResponse {
        text: text.to_string(),
        model: "mock".into(),
        finish_reason: "STOP".into(),
        input_tokens: 0,
        output_tokens: 0,
    }
}

#[async_trait::async_trait]
impl LlmJson for MockLlm {
    async fn generate_json(&self, prompt: &str, _schema: &serde_json::Value) -> Result<JsonResponse, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("{}")))
    }
}
