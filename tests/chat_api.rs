//! Router-level tests exercising the chat and health routes end to end with
//! in-memory service fakes.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use ragchat_backend::config::Settings;
use ragchat_backend::errors::ApiError;
use ragchat_backend::llm::provider::LlmProvider;
use ragchat_backend::llm::types::ChatRequest;
use ragchat_backend::llm::LlmService;
use ragchat_backend::rag::engine::NO_CONTEXT_ANSWER;
use ragchat_backend::rag::RagEngine;
use ragchat_backend::server::router::router;
use ragchat_backend::state::AppState;
use ragchat_backend::vector::{QueryMatch, StoredVector, VectorClient, VectorStore};

struct FakeLlm {
    reply: &'static str,
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &str {
        "fake"
    }

    async fn chat(&self, _request: ChatRequest, _model_id: &str) -> Result<String, ApiError> {
        Ok(self.reply.to_string())
    }

    async fn embed(&self, inputs: &[String], _model_id: &str) -> Result<Vec<Vec<f32>>, ApiError> {
        Ok(inputs.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

struct FixedStore {
    matches: Vec<QueryMatch>,
}

#[async_trait]
impl VectorStore for FixedStore {
    async fn upsert(&self, _vectors: Vec<StoredVector>, _namespace: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn query(
        &self,
        _vector: &[f32],
        _namespace: &str,
        top_k: usize,
        _include_metadata: bool,
    ) -> Result<Vec<QueryMatch>, ApiError> {
        let mut matches = self.matches.clone();
        matches.truncate(top_k);
        Ok(matches)
    }
}

fn test_settings() -> Arc<Settings> {
    Arc::new(Settings {
        openai_api_key: "test-key".to_string(),
        openai_base_url: "http://localhost:0".to_string(),
        pinecone_api_key: "test-key".to_string(),
        pinecone_index_name: "test-index".to_string(),
        pinecone_environment: "us-east-1-aws".to_string(),
        namespace: "avengers-bot".to_string(),
        transcripts_dir: PathBuf::from("transcripts"),
        port: 0,
        log_dir: None,
    })
}

fn test_app(reply: &'static str, matches: Vec<QueryMatch>) -> axum::Router {
    let llm = LlmService::new(Arc::new(FakeLlm { reply }));
    let vectors = VectorClient::new(Arc::new(FixedStore { matches }));
    let state = AppState::new(test_settings(), RagEngine::new(llm, vectors));
    router(state)
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_app("unused", Vec::new());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn chat_answers_from_retrieved_context() {
    let matches = vec![QueryMatch {
        id: "thor:0".to_string(),
        score: 0.97,
        metadata: Some(json!({ "text": "Thor is the god of thunder." })),
    }];
    let app = test_app("He is the god of thunder.", matches);

    let response = app
        .oneshot(chat_request(json!({ "message": "Who is Thor?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "response": "He is the god of thunder." })
    );
}

#[tokio::test]
async fn chat_with_no_matches_returns_no_context_answer() {
    let app = test_app("unused", Vec::new());

    let response = app
        .oneshot(chat_request(json!({ "message": "Who is Thor?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "response": NO_CONTEXT_ANSWER })
    );
}

#[tokio::test]
async fn chat_rejects_blank_message() {
    let app = test_app("unused", Vec::new());

    let response = app
        .oneshot(chat_request(json!({ "message": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
