use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::rag::DEFAULT_TOP_K;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub response: String,
}

/// POST /api/chat — answer one user message against the configured
/// namespace. The pipeline itself degrades every internal failure to a
/// fixed answer string, so this handler only rejects empty input.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let response = state
        .engine
        .answer(&body.message, &state.settings.namespace, DEFAULT_TOP_K)
        .await;

    Ok(Json(ChatResponseBody { response }))
}
