//! Request-time retrieval-and-answer pipeline: embed the query, pull the
//! nearest chunks from the index, and ask the chat model to answer from
//! that context alone.

use crate::llm::{ChatMessage, LlmService};
use crate::vector::VectorClient;

pub const DEFAULT_TOP_K: usize = 5;

pub const NO_CONTEXT_ANSWER: &str =
    "I couldn't find any relevant information to answer your question.";
pub const EMPTY_COMPLETION_ANSWER: &str =
    "I don't have enough information to answer that question.";
pub const PIPELINE_ERROR_ANSWER: &str =
    "I encountered an error while processing your request. Please try again.";

const CONTEXT_SEPARATOR: &str = "\n---\n";
const CONTEXT_FENCE: &str = "--------------------";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on \
the provided context. If the answer cannot be found in the context, say \"I don't know\" \
instead of making up an answer.";

#[derive(Clone)]
pub struct RagEngine {
    llm: LlmService,
    vectors: VectorClient,
}

impl RagEngine {
    pub fn new(llm: LlmService, vectors: VectorClient) -> Self {
        Self { llm, vectors }
    }

    /// Answer a user query against one namespace. Best-effort and
    /// non-retrying: every failure mode degrades to one of the fixed
    /// fallback strings, never an error.
    pub async fn answer(&self, query: &str, namespace: &str, top_k: usize) -> String {
        match self.try_answer(query, namespace, top_k).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!("chat pipeline failed: {}", err);
                PIPELINE_ERROR_ANSWER.to_string()
            }
        }
    }

    async fn try_answer(
        &self,
        query: &str,
        namespace: &str,
        top_k: usize,
    ) -> Result<String, crate::errors::ApiError> {
        let query_embeddings = self.llm.embed(&[query.to_string()]).await;

        // No query embedding means retrieval is pointless; fall through with
        // no context rather than failing.
        let context_texts: Vec<String> = match query_embeddings.first() {
            Some(embedding) => self
                .vectors
                .query(embedding, namespace, top_k, true)
                .await
                .iter()
                .filter_map(|m| m.text())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        if context_texts.is_empty() {
            tracing::info!("no relevant context found for query in '{}'", namespace);
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        let context_block = context_texts.join(CONTEXT_SEPARATOR);
        let completion = self.llm.chat(build_prompt(&context_block, query)).await?;

        let completion = completion.trim();
        if completion.is_empty() {
            return Ok(EMPTY_COMPLETION_ANSWER.to_string());
        }

        Ok(completion.to_string())
    }
}

fn build_prompt(context_block: &str, query: &str) -> Vec<ChatMessage> {
    let user_prompt = format!(
        "Context information is below.\n{fence}\n{context}\n{fence}\nGiven the context \
information and not prior knowledge, answer the query.\nQuery: {query}",
        fence = CONTEXT_FENCE,
        context = context_block,
        query = query,
    );

    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt),
    ]
}
