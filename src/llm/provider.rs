use async_trait::async_trait;

use super::types::ChatRequest;
use crate::errors::ApiError;

/// Backend for embedding generation and chat completion. The production
/// implementation talks to an OpenAI-compatible HTTP API; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// provider name for log lines (e.g. "openai")
    fn name(&self) -> &str;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, ApiError>;

    /// generate one embedding per input, preserving input order
    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, ApiError>;
}
