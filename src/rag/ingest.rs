use std::path::{Path, PathBuf};

use anyhow::Context;

use super::chunker::split_paragraphs;
use crate::llm::LlmService;
use crate::vector::{VectorClient, DEFAULT_BATCH_SIZE};

/// What a directory ingestion run accomplished.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestSummary {
    pub files: usize,
    pub chunks: usize,
}

/// Ingest every `.txt` file in `dir` (non-recursive): chunk it on blank
/// lines, embed all chunks in one call, and upsert them under an id prefix
/// derived from the file name (extension stripped). Files producing no
/// chunks, or whose embedding call yields nothing, are skipped with a log
/// line. Repeated runs overwrite records at the same ids.
pub async fn ingest_directory(
    dir: &Path,
    namespace: &str,
    llm: &LlmService,
    vectors: &VectorClient,
) -> anyhow::Result<IngestSummary> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read transcripts directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().map(|ext| ext == "txt").unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut summary = IngestSummary::default();

    for path in paths {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let chunks = split_paragraphs(&text);
        if chunks.is_empty() {
            tracing::warn!("{}: no chunks, skipping", path.display());
            continue;
        }

        let embeddings = llm.embed(&chunks).await;
        if embeddings.is_empty() {
            tracing::warn!("{}: no embeddings returned, skipping", path.display());
            continue;
        }

        let id_prefix = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "doc".to_string());

        vectors
            .upsert_chunks(&chunks, &embeddings, namespace, &id_prefix, DEFAULT_BATCH_SIZE)
            .await
            .with_context(|| format!("Failed to upsert chunks from {}", path.display()))?;

        tracing::info!(
            "uploaded {} chunks from {} to namespace '{}'",
            chunks.len(),
            path.display(),
            namespace
        );

        summary.files += 1;
        summary.chunks += chunks.len();
    }

    Ok(summary)
}
