use std::sync::Arc;

use super::provider::LlmProvider;
use super::types::{ChatMessage, ChatRequest};
use crate::errors::ApiError;

pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const CHAT_TEMPERATURE: f64 = 0.7;
pub const CHAT_MAX_TOKENS: u32 = 500;

/// High-level LLM operations with the error policy the pipelines rely on:
/// embedding degrades to an empty result instead of raising, chat propagates
/// so the caller can fall back to a fixed answer.
#[derive(Clone)]
pub struct LlmService {
    provider: Arc<dyn LlmProvider>,
}

impl LlmService {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Embed the non-blank inputs, preserving order. Blank inputs are
    /// discarded before the remote call; if nothing remains, no call is made.
    /// Remote failures are logged and yield an empty list.
    pub async fn embed(&self, texts: &[String]) -> Vec<Vec<f32>> {
        let clean: Vec<String> = texts
            .iter()
            .filter(|text| !text.trim().is_empty())
            .cloned()
            .collect();

        if clean.is_empty() {
            tracing::debug!("no non-empty texts to embed, skipping remote call");
            return Vec::new();
        }

        match self.provider.embed(&clean, EMBEDDING_MODEL).await {
            Ok(embeddings) => {
                tracing::debug!(
                    "generated {} embeddings for {} texts",
                    embeddings.len(),
                    clean.len()
                );
                embeddings
            }
            Err(err) => {
                tracing::error!("{} embedding call failed: {}", self.provider.name(), err);
                Vec::new()
            }
        }
    }

    /// Chat completion with the fixed model and sampling parameters.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, ApiError> {
        let mut request = ChatRequest::new(messages);
        request.temperature = Some(CHAT_TEMPERATURE);
        request.max_tokens = Some(CHAT_MAX_TOKENS);
        self.provider.chat(request, CHAT_MODEL).await
    }
}
