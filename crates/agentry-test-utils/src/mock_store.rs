// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process vector store for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use agentry_core::traits::{PluginAdapter, VectorStoreAdapter};
use agentry_core::types::{AdapterType, HealthStatus, SearchHit, VectorRecord};
use agentry_core::AgentryError;

struct Collection {
    dimensions: usize,
    records: Vec<VectorRecord>,
}

/// A single in-memory collection with brute-force cosine search.
///
/// Mirrors the real stores: upserts never deduplicate, and vectors whose
/// size differs from the collection's are rejected.
pub struct MemoryVectorStore {
    collection: String,
    inner: Mutex<Option<Collection>>,
    offline: AtomicBool,
}

impl MemoryVectorStore {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            inner: Mutex::new(None),
            offline: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail with `VectorStoreConnection`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of stored records.
    pub async fn records(&self) -> Vec<VectorRecord> {
        self.inner
            .lock()
            .await
            .as_ref()
            .map(|c| c.records.clone())
            .unwrap_or_default()
    }

    fn check_online(&self) -> Result<(), AgentryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AgentryError::VectorStoreConnection {
                store: "memory".to_string(),
                message: "store is offline".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

fn store_err(message: String) -> AgentryError {
    AgentryError::VectorStoreConnection {
        store: "memory".to_string(),
        message,
        source: None,
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[async_trait]
impl PluginAdapter for MemoryVectorStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VectorStore
    }

    async fn health_check(&self) -> Result<HealthStatus, AgentryError> {
        self.check_online()?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl VectorStoreAdapter for MemoryVectorStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn exists(&self) -> Result<bool, AgentryError> {
        self.check_online()?;
        Ok(self.inner.lock().await.is_some())
    }

    async fn create(&self, dimensions: usize) -> Result<(), AgentryError> {
        self.check_online()?;
        let mut inner = self.inner.lock().await;
        if inner.is_none() {
            *inner = Some(Collection {
                dimensions,
                records: Vec::new(),
            });
        }
        Ok(())
    }

    async fn drop_collection(&self) -> Result<(), AgentryError> {
        self.check_online()?;
        *self.inner.lock().await = None;
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), AgentryError> {
        self.check_online()?;
        let mut inner = self.inner.lock().await;
        let collection = inner
            .as_mut()
            .ok_or_else(|| store_err(format!("collection `{}` does not exist", self.collection)))?;
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != collection.dimensions) {
            return Err(store_err(format!(
                "vector size {} does not match collection size {}",
                bad.embedding.len(),
                collection.dimensions
            )));
        }
        collection.records.extend(records);
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, AgentryError> {
        self.check_online()?;
        let inner = self.inner.lock().await;
        let Some(collection) = inner.as_ref() else {
            return Ok(Vec::new());
        };
        if query.len() != collection.dimensions {
            return Err(store_err(format!(
                "query vector size {} does not match collection size {}",
                query.len(),
                collection.dimensions
            )));
        }
        let mut hits: Vec<SearchHit> = collection
            .records
            .iter()
            .map(|r| SearchHit {
                name: r.name.clone(),
                content: r.content.clone(),
                score: cosine(query, &r.embedding),
                meta: r.meta.clone(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn count(&self) -> Result<u64, AgentryError> {
        self.check_online()?;
        Ok(self
            .inner
            .lock()
            .await
            .as_ref()
            .map_or(0, |c| c.records.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str, embedding: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: "doc".into(),
            content: content.into(),
            embedding,
            meta: Default::default(),
        }
    }

    #[tokio::test]
    async fn search_ranks_by_cosine() {
        let store = MemoryVectorStore::new("c");
        store.create(2).await.unwrap();
        store
            .upsert(vec![record("x", vec![1.0, 0.0]), record("y", vec![0.0, 1.0])])
            .await
            .unwrap();
        let hits = store.search(&[0.1, 0.9], 1).await.unwrap();
        assert_eq!(hits[0].content, "y");
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() {
        let store = MemoryVectorStore::new("c");
        store.create(3).await.unwrap();
        assert!(store.upsert(vec![record("x", vec![1.0])]).await.is_err());
        assert!(store.search(&[1.0, 0.0], 1).await.is_err());
    }
}
