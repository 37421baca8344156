//! VectorStore trait and the batching client layered on top of it.
//!
//! The trait is the raw remote surface (one upsert call, one query call);
//! `VectorClient` adds the bulk-write contract: id assignment, fixed-size
//! batching, count validation and degrade-to-empty queries.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::ApiError;

pub const DEFAULT_BATCH_SIZE: usize = 50;

/// A single record as persisted in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVector {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: serde_json::Value,
}

/// One similarity-search result. Higher score = more similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl QueryMatch {
    /// The chunk text carried in metadata, if present.
    pub fn text(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("text")?.as_str()
    }
}

/// Raw remote index operations, namespace-scoped.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Upsert one batch of vectors into a namespace.
    async fn upsert(&self, vectors: Vec<StoredVector>, namespace: &str) -> Result<(), ApiError>;

    /// Top-k nearest neighbors of `vector` within a namespace, descending
    /// by score.
    async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>, ApiError>;
}

/// Client wrapper implementing the bulk-write and query contracts used by
/// the ingestion and retrieval pipelines.
#[derive(Clone)]
pub struct VectorClient {
    store: Arc<dyn VectorStore>,
}

impl VectorClient {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Bulk-upsert text chunks with their embeddings.
    ///
    /// Ids are `"{id_prefix}:{offset}"` where offset is the position in the
    /// whole input, not within a batch, so ids stay unique and stable across
    /// batches and re-running with the same prefix overwrites in place.
    ///
    /// A texts/embeddings count mismatch is logged and skipped without
    /// writing. A failing batch is logged and propagated, aborting the
    /// remaining batches; batches already written stay committed.
    pub async fn upsert_chunks(
        &self,
        texts: &[String],
        embeddings: &[Vec<f32>],
        namespace: &str,
        id_prefix: &str,
        batch_size: usize,
    ) -> Result<(), ApiError> {
        if texts.is_empty() || embeddings.is_empty() {
            tracing::warn!("no texts or embeddings provided for upsert");
            return Ok(());
        }

        if texts.len() != embeddings.len() {
            tracing::error!(
                "upsert mismatch: {} texts vs {} embeddings, skipping write",
                texts.len(),
                embeddings.len()
            );
            return Ok(());
        }

        let batch_size = batch_size.max(1);
        let total = texts.len();
        let batch_count = total.div_ceil(batch_size);
        tracing::info!(
            "uploading {} vectors to namespace '{}' in batches of {}",
            total,
            namespace,
            batch_size
        );

        for (batch_index, start) in (0..total).step_by(batch_size).enumerate() {
            let end = (start + batch_size).min(total);

            let vectors: Vec<StoredVector> = texts[start..end]
                .iter()
                .zip(embeddings[start..end].iter())
                .enumerate()
                .map(|(j, (text, embedding))| StoredVector {
                    id: format!("{}:{}", id_prefix, start + j),
                    values: embedding.clone(),
                    metadata: json!({ "text": text }),
                })
                .collect();

            tracing::info!(
                "uploading batch {}/{} (items {}-{} of {})",
                batch_index + 1,
                batch_count,
                start + 1,
                end,
                total
            );

            if let Err(err) = self.store.upsert(vectors, namespace).await {
                tracing::error!("batch {}/{} failed: {}", batch_index + 1, batch_count, err);
                return Err(err);
            }

            tracing::info!("uploaded batch of {} vectors", end - start);
        }

        Ok(())
    }

    /// Query the index, degrading to an empty result on remote failure.
    pub async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        include_metadata: bool,
    ) -> Vec<QueryMatch> {
        match self
            .store
            .query(vector, namespace, top_k, include_metadata)
            .await
        {
            Ok(matches) => {
                tracing::debug!("found {} matches in namespace '{}'", matches.len(), namespace);
                matches
            }
            Err(err) => {
                tracing::error!("vector query failed: {}", err);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        batches: Mutex<Vec<Vec<StoredVector>>>,
        fail_on_batch: Option<usize>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn upsert(
            &self,
            vectors: Vec<StoredVector>,
            _namespace: &str,
        ) -> Result<(), ApiError> {
            let mut batches = self.batches.lock().unwrap();
            if self.fail_on_batch == Some(batches.len()) {
                return Err(ApiError::Upstream("batch rejected".to_string()));
            }
            batches.push(vectors);
            Ok(())
        }

        async fn query(
            &self,
            _vector: &[f32],
            _namespace: &str,
            top_k: usize,
            _include_metadata: bool,
        ) -> Result<Vec<QueryMatch>, ApiError> {
            let mut matches: Vec<QueryMatch> = (0..top_k + 2)
                .map(|i| QueryMatch {
                    id: format!("m{}", i),
                    score: 1.0 - i as f32 * 0.1,
                    metadata: None,
                })
                .collect();
            matches.truncate(top_k);
            Ok(matches)
        }
    }

    fn inputs(n: usize) -> (Vec<String>, Vec<Vec<f32>>) {
        let texts = (0..n).map(|i| format!("chunk {}", i)).collect();
        let embeddings = (0..n).map(|i| vec![i as f32, 1.0]).collect();
        (texts, embeddings)
    }

    #[tokio::test]
    async fn upsert_batches_with_global_offset_ids() {
        let store = Arc::new(RecordingStore::default());
        let client = VectorClient::new(store.clone());

        let (texts, embeddings) = inputs(120);
        client
            .upsert_chunks(&texts, &embeddings, "ns", "doc", 50)
            .await
            .unwrap();

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 50);
        assert_eq!(batches[1].len(), 50);
        assert_eq!(batches[2].len(), 20);

        let mut ids: Vec<String> = batches
            .iter()
            .flatten()
            .map(|v| v.id.clone())
            .collect();
        let expected: Vec<String> = (0..120).map(|i| format!("doc:{}", i)).collect();
        assert_eq!(ids.len(), 120);
        ids.sort();
        let mut sorted_expected = expected.clone();
        sorted_expected.sort();
        assert_eq!(ids, sorted_expected);

        // second record of the second batch carries its global offset
        assert_eq!(batches[1][1].id, "doc:51");
        assert_eq!(batches[1][1].metadata["text"], "chunk 51");
    }

    #[tokio::test]
    async fn upsert_mismatched_counts_writes_nothing() {
        let store = Arc::new(RecordingStore::default());
        let client = VectorClient::new(store.clone());

        let (texts, _) = inputs(3);
        let embeddings = vec![vec![0.0]; 2];
        let result = client
            .upsert_chunks(&texts, &embeddings, "ns", "doc", 50)
            .await;

        assert!(result.is_ok());
        assert!(store.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_failure_aborts_remaining_batches() {
        let store = Arc::new(RecordingStore {
            batches: Mutex::new(Vec::new()),
            fail_on_batch: Some(1),
        });
        let client = VectorClient::new(store.clone());

        let (texts, embeddings) = inputs(120);
        let result = client
            .upsert_chunks(&texts, &embeddings, "ns", "doc", 50)
            .await;

        assert!(result.is_err());
        // first batch stays committed, nothing after the failure
        assert_eq!(store.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn query_respects_top_k_and_score_order() {
        let store = Arc::new(RecordingStore::default());
        let client = VectorClient::new(store.clone());

        let matches = client.query(&[1.0, 0.0], "ns", 3, true).await;

        assert!(matches.len() <= 3);
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn query_failure_degrades_to_empty() {
        struct FailingStore;

        #[async_trait]
        impl VectorStore for FailingStore {
            async fn upsert(
                &self,
                _vectors: Vec<StoredVector>,
                _namespace: &str,
            ) -> Result<(), ApiError> {
                Ok(())
            }

            async fn query(
                &self,
                _vector: &[f32],
                _namespace: &str,
                _top_k: usize,
                _include_metadata: bool,
            ) -> Result<Vec<QueryMatch>, ApiError> {
                Err(ApiError::Upstream("index offline".to_string()))
            }
        }

        let client = VectorClient::new(Arc::new(FailingStore));
        let matches = client.query(&[1.0], "ns", 5, true).await;
        assert!(matches.is_empty());
    }
}
