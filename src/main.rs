use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use ragchat_backend::config::Settings;
use ragchat_backend::llm::{LlmService, OpenAiProvider};
use ragchat_backend::logging;
use ragchat_backend::rag::RagEngine;
use ragchat_backend::server::router::router;
use ragchat_backend::state::AppState;
use ragchat_backend::vector::{PineconeStore, VectorClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Arc::new(Settings::from_env()?);
    logging::init(settings.log_dir.as_deref());

    let provider = Arc::new(OpenAiProvider::new(
        settings.openai_base_url.clone(),
        settings.openai_api_key.clone(),
    ));
    let llm = LlmService::new(provider);

    let store = PineconeStore::connect(
        settings.pinecone_api_key.clone(),
        &settings.pinecone_index_name,
        &settings.pinecone_environment,
    )
    .await
    .context("Failed to connect to Pinecone index")?;
    let vectors = VectorClient::new(Arc::new(store));

    let engine = RagEngine::new(llm, vectors);
    let state = AppState::new(settings.clone(), engine);

    let bind_addr = format!("127.0.0.1:{}", settings.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
