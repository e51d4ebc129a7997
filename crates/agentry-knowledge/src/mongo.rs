// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MongoDB vector store.
//!
//! Chunks are stored as plain documents with their embedding. With an Atlas
//! Vector Search index configured, similarity search runs `$vectorSearch` on
//! the server. Without one, the collection is streamed and ranked by cosine
//! similarity on the client, keeping only the best `limit` chunks in memory.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use agentry_core::traits::{PluginAdapter, VectorStoreAdapter};
use agentry_core::types::{AdapterType, HealthStatus, MongoParams, SearchHit, VectorRecord};
use agentry_core::AgentryError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

const STORE: &str = "mongodb";

/// Candidates scanned per returned hit by `$vectorSearch`.
const CANDIDATES_PER_HIT: usize = 10;

fn store_err(context: &str, e: mongodb::error::Error) -> AgentryError {
    AgentryError::VectorStoreConnection {
        store: STORE.to_string(),
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChunk {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    content: String,
    embedding: Vec<f32>,
    #[serde(default)]
    meta: serde_json::Map<String, serde_json::Value>,
}

/// A `$vectorSearch` result row after projection.
#[derive(Debug, Deserialize)]
struct IndexedHit {
    name: String,
    content: String,
    #[serde(default)]
    meta: serde_json::Map<String, serde_json::Value>,
    score: f64,
}

/// Cosine similarity of two equal-length vectors; zero when either is all zeros.
pub(crate) fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

struct Ranked(SearchHit);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.score.total_cmp(&other.0.score)
    }
}

/// Bounded top-N selection over streamed chunks.
struct TopHits<'q> {
    query: &'q [f32],
    limit: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl<'q> TopHits<'q> {
    fn new(query: &'q [f32], limit: usize) -> Self {
        Self {
            query,
            limit,
            heap: BinaryHeap::with_capacity(limit.saturating_add(1)),
        }
    }

    /// Scores `chunk` against the query. A stored vector of another size
    /// means the collection was embedded with a different model.
    fn offer(&mut self, chunk: StoredChunk) -> Result<(), AgentryError> {
        if chunk.embedding.len() != self.query.len() {
            return Err(AgentryError::VectorStoreConnection {
                store: STORE.to_string(),
                message: format!(
                    "dimension mismatch: query {} vs stored {} (chunk {})",
                    self.query.len(),
                    chunk.embedding.len(),
                    chunk.name
                ),
                source: None,
            });
        }
        self.heap.push(Reverse(Ranked(SearchHit {
            score: cosine(self.query, &chunk.embedding),
            name: chunk.name,
            content: chunk.content,
            meta: chunk.meta,
        })));
        if self.heap.len() > self.limit {
            self.heap.pop();
        }
        Ok(())
    }

    /// Best hit first.
    fn into_hits(self) -> Vec<SearchHit> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(Ranked(hit))| hit)
            .collect()
    }
}

/// A MongoDB collection of embedded chunks. The client is created on first use.
pub struct MongoStore {
    params: MongoParams,
    client: OnceCell<Client>,
}

impl MongoStore {
    pub fn new(params: MongoParams) -> Self {
        Self {
            params,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Client, AgentryError> {
        self.client
            .get_or_try_init(|| async {
                info!(database = %self.params.database, "connecting to MongoDB");
                Client::with_uri_str(&self.params.connection_string)
                    .await
                    .map_err(|e| store_err("failed to create client", e))
            })
            .await
    }

    async fn chunks(&self) -> Result<Collection<StoredChunk>, AgentryError> {
        Ok(self
            .client()
            .await?
            .database(&self.params.database)
            .collection(&self.params.collection))
    }

    async fn search_index(
        &self,
        index: &str,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchHit>, AgentryError> {
        let query_vector: Vec<Bson> = query.iter().map(|v| Bson::Double(f64::from(*v))).collect();
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let candidates = i64::try_from(limit.saturating_mul(CANDIDATES_PER_HIT)).unwrap_or(i64::MAX);
        let pipeline: Vec<Document> = vec![
            doc! {
                "$vectorSearch": {
                    "index": index,
                    "path": "embedding",
                    "queryVector": query_vector,
                    "numCandidates": candidates,
                    "limit": limit_i64,
                }
            },
            doc! {
                "$project": {
                    "_id": 0,
                    "name": 1,
                    "content": 1,
                    "meta": 1,
                    "score": {"$meta": "vectorSearchScore"},
                }
            },
        ];
        let mut cursor = self
            .chunks()
            .await?
            .aggregate(pipeline)
            .await
            .map_err(|e| store_err("vector search failed", e))?;
        let mut hits = Vec::with_capacity(limit);
        while let Some(row) = cursor
            .try_next()
            .await
            .map_err(|e| store_err("vector search failed", e))?
        {
            let hit: IndexedHit = mongodb::bson::from_document(row).map_err(|e| {
                AgentryError::VectorStoreConnection {
                    store: STORE.to_string(),
                    message: format!("unexpected vector search row: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;
            hits.push(SearchHit {
                name: hit.name,
                content: hit.content,
                score: hit.score as f32,
                meta: hit.meta,
            });
        }
        debug!(index, hits = hits.len(), "atlas vector search");
        Ok(hits)
    }

    async fn search_scan(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, AgentryError> {
        let mut cursor = self
            .chunks()
            .await?
            .find(doc! {})
            .await
            .map_err(|e| store_err("search failed", e))?;
        let mut top = TopHits::new(query, limit);
        while let Some(chunk) = cursor
            .try_next()
            .await
            .map_err(|e| store_err("search failed", e))?
        {
            top.offer(chunk)?;
        }
        Ok(top.into_hits())
    }
}

#[async_trait]
impl PluginAdapter for MongoStore {
    fn name(&self) -> &str {
        STORE
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VectorStore
    }

    async fn health_check(&self) -> Result<HealthStatus, AgentryError> {
        let client = match self.client().await {
            Ok(c) => c,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        match client.database("admin").run_command(doc! {"ping": 1}).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl VectorStoreAdapter for MongoStore {
    fn collection(&self) -> &str {
        &self.params.collection
    }

    async fn exists(&self) -> Result<bool, AgentryError> {
        let names = self
            .client()
            .await?
            .database(&self.params.database)
            .list_collection_names()
            .await
            .map_err(|e| store_err("failed to list collections", e))?;
        Ok(names.iter().any(|n| n == &self.params.collection))
    }

    async fn create(&self, _dimensions: usize) -> Result<(), AgentryError> {
        if self.exists().await? {
            return Ok(());
        }
        self.client()
            .await?
            .database(&self.params.database)
            .create_collection(&self.params.collection)
            .await
            .map_err(|e| store_err("failed to create collection", e))?;
        info!(collection = %self.params.collection, "mongodb collection created");
        Ok(())
    }

    async fn drop_collection(&self) -> Result<(), AgentryError> {
        self.chunks()
            .await?
            .drop()
            .await
            .map_err(|e| store_err("failed to drop collection", e))?;
        info!(collection = %self.params.collection, "mongodb collection dropped");
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), AgentryError> {
        if records.is_empty() {
            return Ok(());
        }
        let count = records.len();
        let docs: Vec<StoredChunk> = records
            .into_iter()
            .map(|r| StoredChunk {
                id: r.id,
                name: r.name,
                content: r.content,
                embedding: r.embedding,
                meta: r.meta,
            })
            .collect();
        self.chunks()
            .await?
            .insert_many(docs)
            .await
            .map_err(|e| store_err("failed to insert documents", e))?;
        debug!(collection = %self.params.collection, count, "documents inserted");
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, AgentryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        match self.params.vector_index.as_deref() {
            Some(index) => self.search_index(index, query, limit).await,
            None => self.search_scan(query, limit).await,
        }
    }

    async fn count(&self) -> Result<u64, AgentryError> {
        self.chunks()
            .await?
            .count_documents(doc! {})
            .await
            .map_err(|e| store_err("count failed", e))
    }
}
