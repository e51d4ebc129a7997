// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembly of a [`KnowledgeAgent`] from configuration. No network I/O.

use std::sync::Arc;
use std::time::Duration;

use agentry_agent::{HttpProviderFactory, with_fallback};
use agentry_core::traits::{DocumentReader, EmbeddingAdapter, ProviderFactory, VectorStoreAdapter};
use agentry_core::types::{BackendCandidate, EmbedderConfig, VectorStoreChoice};
use agentry_core::AgentryError;
use agentry_ollama::OllamaEmbedder;
use tracing::info;

use crate::agent::KnowledgeAgent;
use crate::mongo::MongoStore;
use crate::pipeline::{DEFAULT_CHUNK_SIZE, DEFAULT_NUM_DOCUMENTS, KnowledgeRetrievalPipeline};
use crate::qdrant::QdrantStore;
use crate::reader::UrlDocumentReader;

/// Timeout for Qdrant requests and document downloads.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds knowledge agents. Any component may be overridden; the rest are
/// derived from the arguments to [`build`](Self::build).
pub struct KnowledgeAgentBuilder {
    primary: BackendCandidate,
    fallback: BackendCandidate,
    chunk_size: usize,
    num_documents: usize,
    factory: Arc<dyn ProviderFactory>,
    embedder: Option<Arc<dyn EmbeddingAdapter>>,
    store: Option<Arc<dyn VectorStoreAdapter>>,
    reader: Option<Arc<dyn DocumentReader>>,
}

impl KnowledgeAgentBuilder {
    pub fn new(primary: BackendCandidate, fallback: BackendCandidate) -> Self {
        Self {
            primary,
            fallback,
            chunk_size: DEFAULT_CHUNK_SIZE,
            num_documents: DEFAULT_NUM_DOCUMENTS,
            factory: Arc::new(HttpProviderFactory),
            embedder: None,
            store: None,
            reader: None,
        }
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn num_documents(mut self, num_documents: usize) -> Self {
        self.num_documents = num_documents;
        self
    }

    pub fn provider_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn vector_store(mut self, store: Arc<dyn VectorStoreAdapter>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn reader(mut self, reader: Arc<dyn DocumentReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Resolves the completion backend and wires up the pipeline.
    pub fn build(
        &self,
        source_urls: Vec<String>,
        vector_choice: &VectorStoreChoice,
        embedder_config: &EmbedderConfig,
    ) -> Result<KnowledgeAgent, AgentryError> {
        let (backend, provider) = with_fallback(&self.primary, &self.fallback, |candidate| {
            self.factory.create(candidate)
        })?;

        let embedder = match &self.embedder {
            Some(e) => e.clone(),
            None => Arc::new(OllamaEmbedder::new(embedder_config)?),
        };
        let store = match &self.store {
            Some(s) => s.clone(),
            None => vector_store_for(vector_choice)?,
        };
        let reader = match &self.reader {
            Some(r) => r.clone(),
            None => Arc::new(UrlDocumentReader::new(HTTP_TIMEOUT)?),
        };

        info!(
            store = %store.name(),
            collection = %store.collection(),
            embedder = %embedder_config.model_id,
            sources = source_urls.len(),
            backend = %backend.label(),
            "knowledge agent assembled"
        );

        let pipeline = KnowledgeRetrievalPipeline::new(store, embedder, reader, source_urls)
            .with_chunk_size(self.chunk_size)
            .with_num_documents(self.num_documents);
        Ok(KnowledgeAgent::new(pipeline, provider, backend))
    }
}

/// The store adapter for a choice. Construction only; nothing is contacted.
pub fn vector_store_for(
    choice: &VectorStoreChoice,
) -> Result<Arc<dyn VectorStoreAdapter>, AgentryError> {
    Ok(match choice {
        VectorStoreChoice::Qdrant(params) => Arc::new(QdrantStore::new(params, HTTP_TIMEOUT)?),
        VectorStoreChoice::Mongo(params) => Arc::new(MongoStore::new(params.clone())),
    })
}
