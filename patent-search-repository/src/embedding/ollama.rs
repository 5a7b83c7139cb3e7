//! Ollama embeddings client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors::ProvisioningError;
use crate::interfaces::Embedder;

/// Default Ollama server URL.
pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:11434";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embedder backed by the `POST /api/embeddings` endpoint of an Ollama server.
///
/// # Example
///
/// ```ignore
/// use patent_search_repository::{Embedder, OllamaEmbedder};
///
/// let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text")?;
/// let vector = embedder.embed("wireless charging coil").await?;
/// ```
pub struct OllamaEmbedder {
    url: String,
    model: String,
    client: ReqwestClient,
}

impl OllamaEmbedder {
    /// Create a client for `base_url` using `model`.
    pub fn new(base_url: &str, model: impl Into<String>) -> Result<Self, ProvisioningError> {
        Self::with_timeout(base_url, model, Duration::from_secs(30))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProvisioningError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ProvisioningError::validation(
                "embedding model must not be empty",
            ));
        }

        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProvisioningError::embedding(e.to_string()))?;

        Ok(Self {
            url: Self::endpoint(base_url),
            model,
            client,
        })
    }

    fn endpoint(base_url: &str) -> String {
        format!("{}/api/embeddings", base_url.trim_end_matches('/'))
    }

    /// Read the vector out of a response body.
    fn parse_response(body: &str) -> Result<Vec<f32>, ProvisioningError> {
        let response: EmbeddingResponse = serde_json::from_str(body).map_err(|e| {
            ProvisioningError::embedding(format!("Invalid embeddings response: {}", e))
        })?;

        if response.embedding.is_empty() {
            return Err(ProvisioningError::embedding(
                "Embeddings response contained an empty vector",
            ));
        }

        Ok(response.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProvisioningError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| ProvisioningError::embedding(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProvisioningError::embedding(e.to_string()))?;

        if !status.is_success() {
            error!(status = %status, body = %body, model = %self.model, "Embedding request failed");
            return Err(ProvisioningError::embedding(format!(
                "Embedding request failed with status {}: {}",
                status, body
            )));
        }

        let embedding = Self::parse_response(&body)?;
        debug!(model = %self.model, dimension = embedding.len(), "Embedding computed");
        Ok(embedding)
    }
}
