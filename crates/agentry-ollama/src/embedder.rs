// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama embedding adapter using the batch `/api/embed` endpoint.

use async_trait::async_trait;
use agentry_core::error::AgentryError;
use agentry_core::traits::{EmbeddingAdapter, PluginAdapter};
use agentry_core::types::{
    AdapterType, EmbedderConfig, EmbeddingInput, EmbeddingOutput, HealthStatus,
};
use tracing::debug;

use crate::client::{OllamaClient, normalize_host};
use crate::types::{EmbedRequest, EmbedResponse};

/// Embedding adapter backed by an Ollama model.
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Constructs the embedder. Performs no network I/O.
    pub fn new(config: &EmbedderConfig) -> Result<Self, AgentryError> {
        let host = normalize_host(&config.host).map_err(|message| {
            AgentryError::Config(format!("embedder: {message}"))
        })?;
        let client = OllamaClient::new(host, config.timeout).map_err(|e| {
            AgentryError::EmbedderUnreachable {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        Ok(Self {
            client,
            model: config.model_id.clone(),
            dimensions: config.dimensions,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl PluginAdapter for OllamaEmbedder {
    fn name(&self) -> &str {
        "ollama-embed"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, AgentryError> {
        match self.client.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl EmbeddingAdapter for OllamaEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, AgentryError> {
        if input.texts.is_empty() {
            return Ok(EmbeddingOutput {
                embeddings: Vec::new(),
                dimensions: self.dimensions,
            });
        }
        let expected = input.texts.len();
        let body = EmbedRequest {
            model: self.model.clone(),
            input: input.texts,
        };
        let response: EmbedResponse = self
            .client
            .post_json("/api/embed", &body)
            .await
            .map_err(|e| AgentryError::EmbedderUnreachable {
                message: e.message,
                source: e.source.map(|s| Box::new(s) as agentry_core::error::BoxError),
            })?;

        if response.embeddings.len() != expected {
            return Err(AgentryError::EmbedderUnreachable {
                message: format!(
                    "embedder returned {} vectors for {expected} inputs",
                    response.embeddings.len()
                ),
                source: None,
            });
        }

        // Report what the model produced; a mismatch with the declared size
        // surfaces at the vector store.
        let dimensions = response
            .embeddings
            .first()
            .map(Vec::len)
            .unwrap_or(self.dimensions);
        debug!(model = %self.model, count = expected, dimensions, "embeddings generated");
        Ok(EmbeddingOutput {
            embeddings: response.embeddings,
            dimensions,
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
