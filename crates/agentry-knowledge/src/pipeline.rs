// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embed, store, load and search: the retrieval pipeline behind a knowledge agent.

use std::sync::Arc;

use agentry_core::traits::{DocumentReader, EmbeddingAdapter, VectorStoreAdapter};
use agentry_core::types::{EmbeddingInput, SearchHit, VectorRecord};
use agentry_core::AgentryError;
use serde::Serialize;
use tracing::{info, warn};

use crate::chunker::chunk_document;

/// Default number of chunks retrieved per query.
pub const DEFAULT_NUM_DOCUMENTS: usize = 5;

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// The leading values and size of one embedding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingSample {
    pub leading: Vec<f32>,
    pub dimension: usize,
}

/// Outcome of [`KnowledgeRetrievalPipeline::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Source URLs read, chunked and stored.
    pub sources_loaded: usize,
    /// Documents (PDF pages, text files) read across those sources.
    pub documents_loaded: usize,
    pub chunks_upserted: usize,
    /// One [`AgentryError::DocumentFetch`] per source that could not be read.
    pub failures: Vec<AgentryError>,
}

/// A vector store, an embedder, a reader and the source URLs to ingest.
///
/// The embedder's dimensionality is not checked against the store; a
/// mismatch surfaces as a store error on upsert or search.
pub struct KnowledgeRetrievalPipeline {
    store: Arc<dyn VectorStoreAdapter>,
    embedder: Arc<dyn EmbeddingAdapter>,
    reader: Arc<dyn DocumentReader>,
    sources: Vec<String>,
    chunk_size: usize,
    num_documents: usize,
}

impl KnowledgeRetrievalPipeline {
    pub fn new(
        store: Arc<dyn VectorStoreAdapter>,
        embedder: Arc<dyn EmbeddingAdapter>,
        reader: Arc<dyn DocumentReader>,
        sources: Vec<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            reader,
            sources,
            chunk_size: DEFAULT_CHUNK_SIZE,
            num_documents: DEFAULT_NUM_DOCUMENTS,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_num_documents(mut self, num_documents: usize) -> Self {
        self.num_documents = num_documents;
        self
    }

    pub fn store(&self) -> &Arc<dyn VectorStoreAdapter> {
        &self.store
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingAdapter> {
        &self.embedder
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn num_documents(&self) -> usize {
        self.num_documents
    }

    /// Embeds `text` and returns its first five values and its size.
    pub async fn embed_sample(&self, text: &str) -> Result<EmbeddingSample, AgentryError> {
        let vector = self.embed_one(text).await?;
        Ok(EmbeddingSample {
            leading: vector.iter().take(5).copied().collect(),
            dimension: vector.len(),
        })
    }

    /// Ingests every source URL, in order.
    ///
    /// With `recreate` the collection is dropped first. Otherwise records are
    /// added to whatever the collection already holds; nothing is
    /// deduplicated, so loading the same sources twice stores them twice.
    /// A source that cannot be fetched or read is recorded in the report and
    /// skipped; embedder and store failures abort the load.
    pub async fn load(&self, recreate: bool) -> Result<LoadReport, AgentryError> {
        let collection = self.store.collection().to_string();
        if recreate {
            info!(store = %self.store.name(), collection = %collection, "recreating collection");
            self.store.drop_collection().await?;
        }
        if !self.store.exists().await? {
            self.store.create(self.embedder.dimensions()).await?;
        }

        let mut report = LoadReport::default();
        for url in &self.sources {
            let documents = match self.reader.read(url).await {
                Ok(documents) => documents,
                Err(e) => {
                    warn!(url = %url, stage = "read", error = %e, "skipping source");
                    report.failures.push(e);
                    continue;
                }
            };

            let chunks: Vec<_> = documents
                .iter()
                .flat_map(|d| chunk_document(d, self.chunk_size))
                .collect();
            let texts = chunks.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed(EmbeddingInput { texts }).await?.embeddings;

            let records: Vec<VectorRecord> = chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| VectorRecord {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: chunk.name,
                    content: chunk.content,
                    embedding,
                    meta: chunk.meta,
                })
                .collect();
            let upserted = records.len();
            self.store.upsert(records).await?;

            info!(url = %url, documents = documents.len(), chunks = upserted, "source loaded");
            report.sources_loaded += 1;
            report.documents_loaded += documents.len();
            report.chunks_upserted += upserted;
        }

        info!(
            collection = %collection,
            sources = report.sources_loaded,
            chunks = report.chunks_upserted,
            failures = report.failures.len(),
            "knowledge load finished"
        );
        Ok(report)
    }

    /// Returns the chunks most similar to `query`, best first.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, AgentryError> {
        let vector = self.embed_one(query).await?;
        self.store.search(&vector, self.num_documents).await
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, AgentryError> {
        self.embedder
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AgentryError::EmbedderUnreachable {
                message: "embedder returned no vectors".to_string(),
                source: None,
            })
    }
}
