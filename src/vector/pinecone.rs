//! Pinecone REST implementation of `VectorStore`.
//!
//! The data-plane host is resolved once at construction from the control
//! plane (`GET /indexes/{name}`); all upserts and queries then go straight
//! to that host.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::store::{QueryMatch, StoredVector, VectorStore};
use crate::errors::ApiError;

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

#[derive(Clone)]
pub struct PineconeStore {
    client: Client,
    api_key: String,
    host: String,
}

impl PineconeStore {
    /// Resolve the index host from the control plane and return a ready
    /// client. Falls back to the environment-derived host when the control
    /// plane does not know the index (legacy pod-based deployments).
    pub async fn connect(
        api_key: String,
        index_name: &str,
        environment: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::new();
        let url = format!("{}/indexes/{}", CONTROL_PLANE_URL, index_name);

        let res = client
            .get(&url)
            .header("Api-Key", &api_key)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        let host = if res.status().is_success() {
            let payload: Value = res.json().await.map_err(ApiError::upstream)?;
            payload["host"]
                .as_str()
                .ok_or_else(|| {
                    ApiError::Upstream(format!(
                        "index description for '{}' is missing a host",
                        index_name
                    ))
                })?
                .to_string()
        } else {
            let fallback = format!("{}.svc.{}.pinecone.io", index_name, environment);
            tracing::warn!(
                "could not describe index '{}' ({}), falling back to host {}",
                index_name,
                res.status(),
                fallback
            );
            fallback
        };

        tracing::info!("using Pinecone index host {}", host);
        Ok(Self::with_host(api_key, host))
    }

    /// Build a client against a known data-plane host, skipping control-plane
    /// resolution.
    pub fn with_host(api_key: String, host: String) -> Self {
        let host = host
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();
        Self {
            client: Client::new(),
            api_key,
            host,
        }
    }

    fn data_url(&self, path: &str) -> String {
        format!("https://{}{}", self.host, path)
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn upsert(&self, vectors: Vec<StoredVector>, namespace: &str) -> Result<(), ApiError> {
        let body = json!({
            "vectors": vectors,
            "namespace": namespace,
        });

        let res = self
            .client
            .post(self.data_url("/vectors/upsert"))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "upsert failed ({}): {}",
                status, text
            )));
        }

        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>, ApiError> {
        let body = json!({
            "vector": vector,
            "topK": top_k,
            "namespace": namespace,
            "includeMetadata": include_metadata,
        });

        let res = self
            .client
            .post(self.data_url("/query"))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "query failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::upstream)?;
        let matches = payload
            .get("matches")
            .cloned()
            .unwrap_or_else(|| json!([]));

        serde_json::from_value(matches).map_err(ApiError::upstream)
    }
}
