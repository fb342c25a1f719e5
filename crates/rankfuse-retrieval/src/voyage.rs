//! Voyage AI embedding provider.
//!
//! HTTP client for the Voyage embeddings API, matching the request shape
//! the hybrid demo used: model, `input_type: "query"`, truncation, and an
//! explicit `output_dimension`.

use async_trait::async_trait;
use rankfuse_core::{Error, Result};

use crate::embedding::EmbeddingProvider;

const DEFAULT_ENDPOINT: &str = "https://api.voyageai.com/v1/embeddings";

/// Embedding provider using the Voyage AI API.
pub struct VoyageEmbeddingProvider {
    api_key: String,
    model: String,
    dimension: usize,
    endpoint: String,
    client: reqwest::Client,
}

impl VoyageEmbeddingProvider {
    /// Create a new Voyage provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Voyage API key
    /// * `model` - Model ID (e.g., "voyage-3.5")
    /// * `dimension` - Requested output dimension (must match the index)
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `dimension` is zero.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::config("embedding dimension must be positive"));
        }
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            dimension,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Override the API endpoint (for testing or proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn request_embeddings(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>> {
        let body = serde_json::json!({
            "input": inputs,
            "model": self.model,
            "input_type": "query",
            "truncation": true,
            "output_dimension": self.dimension,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::retrieval(self.name(), format!("embedding request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::retrieval(
                self.name(),
                format!("embedding API error {status}: {error_text}"),
            ));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::retrieval(self.name(), format!("embedding response: {e}")))?;

        let data = response_body["data"]
            .as_array()
            .ok_or_else(|| Error::retrieval(self.name(), "missing data in response"))?;

        let mut embeddings = Vec::with_capacity(data.len());
        for entry in data {
            let embedding: Vec<f32> = entry["embedding"]
                .as_array()
                .ok_or_else(|| Error::retrieval(self.name(), "missing embedding in response"))?
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                .collect();

            if embedding.len() != self.dimension {
                return Err(Error::retrieval(
                    self.name(),
                    format!(
                        "embedding dimension mismatch: expected {}, got {}",
                        self.dimension,
                        embedding.len()
                    ),
                ));
            }
            embeddings.push(embedding);
        }

        if embeddings.len() != inputs.len() {
            return Err(Error::retrieval(
                self.name(),
                format!(
                    "embedding count mismatch: sent {}, got {}",
                    inputs.len(),
                    embeddings.len()
                ),
            ));
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for VoyageEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.request_embeddings(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::retrieval(self.name(), "empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.request_embeddings(&inputs).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "voyage"
    }
}
