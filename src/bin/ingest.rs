//! Offline ingestion: chunk every `.txt` file in the transcripts directory
//! and upsert the embedded chunks into the configured namespace.

use std::sync::Arc;

use anyhow::Context;

use ragchat_backend::config::Settings;
use ragchat_backend::llm::{LlmService, OpenAiProvider};
use ragchat_backend::logging;
use ragchat_backend::rag::ingest_directory;
use ragchat_backend::vector::{PineconeStore, VectorClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
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

    let summary = ingest_directory(
        &settings.transcripts_dir,
        &settings.namespace,
        &llm,
        &vectors,
    )
    .await?;

    println!(
        "Uploaded {} chunks from {} files in {} to namespace '{}'",
        summary.chunks,
        summary.files,
        settings.transcripts_dir.display(),
        settings.namespace
    );

    Ok(())
}
