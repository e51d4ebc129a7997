// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qdrant vector store over the gRPC API of `qdrant-client`.
//!
//! `qdrant.url` must address the gRPC port (6334 on a default install).

use std::time::Duration;

use agentry_core::traits::{PluginAdapter, VectorStoreAdapter};
use agentry_core::types::{AdapterType, HealthStatus, QdrantParams, SearchHit, VectorRecord};
use agentry_core::AgentryError;
use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant, QdrantError};
use serde_json::{json, Value};
use tracing::{debug, info};

const STORE: &str = "qdrant";

fn store_err(context: &str, e: QdrantError) -> AgentryError {
    AgentryError::VectorStoreConnection {
        store: STORE.to_string(),
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Converts a payload value returned by Qdrant into JSON.
fn to_json(value: QdrantValue) -> Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::from(i),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d).map_or(Value::Null, Value::Number),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => Value::Array(list.values.into_iter().map(to_json).collect()),
        Some(Kind::StructValue(st)) => Value::Object(
            st.fields
                .into_iter()
                .map(|(key, value)| (key, to_json(value)))
                .collect(),
        ),
    }
}

fn hit_from_point(point: ScoredPoint) -> SearchHit {
    let mut payload = point.payload;
    let mut text = |key: &str| match payload.remove(key).map(to_json) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };
    let name = text("name");
    let content = text("content");
    let meta = match payload.remove("meta").map(to_json) {
        Some(Value::Object(map)) => map,
        _ => Default::default(),
    };
    SearchHit {
        name,
        content,
        score: point.score,
        meta,
    }
}

fn point_from_record(record: VectorRecord) -> Result<PointStruct, AgentryError> {
    let payload = Payload::try_from(json!({
        "name": record.name,
        "content": record.content,
        "meta": record.meta,
    }))
    .map_err(|e| store_err("invalid point payload", e))?;
    Ok(PointStruct::new(record.id, record.embedding, payload))
}

/// A single Qdrant collection, addressed by URL and optional API key.
///
/// Construction performs no I/O; the gRPC channel connects on first use.
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
}

impl QdrantStore {
    pub fn new(params: &QdrantParams, timeout: Duration) -> Result<Self, AgentryError> {
        let client = Qdrant::from_url(&params.url)
            .api_key(params.api_key.clone().filter(|k| !k.is_empty()))
            .timeout(timeout)
            .skip_compatibility_check()
            .build()
            .map_err(|e| store_err("failed to create client", e))?;
        Ok(Self {
            client,
            collection: params.collection.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for QdrantStore {
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
        match self.client.health_check().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl VectorStoreAdapter for QdrantStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn exists(&self) -> Result<bool, AgentryError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| store_err("failed to check collection", e))
    }

    async fn create(&self, dimensions: usize) -> Result<(), AgentryError> {
        if self.exists().await? {
            debug!(collection = %self.collection, "qdrant collection already exists");
            return Ok(());
        }
        let size = u64::try_from(dimensions).unwrap_or(u64::MAX);
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(size, Distance::Cosine)),
            )
            .await
            .map_err(|e| store_err("failed to create collection", e))?;
        info!(collection = %self.collection, dimensions, "qdrant collection created");
        Ok(())
    }

    async fn drop_collection(&self) -> Result<(), AgentryError> {
        if !self.exists().await? {
            return Ok(());
        }
        self.client
            .delete_collection(&self.collection)
            .await
            .map_err(|e| store_err("failed to drop collection", e))?;
        info!(collection = %self.collection, "qdrant collection dropped");
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), AgentryError> {
        if records.is_empty() {
            return Ok(());
        }
        let count = records.len();
        let points = records
            .into_iter()
            .map(point_from_record)
            .collect::<Result<Vec<_>, _>>()?;
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| store_err("failed to upsert points", e))?;
        debug!(collection = %self.collection, points = count, "points upserted");
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, AgentryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = u64::try_from(limit).unwrap_or(u64::MAX);
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.to_vec(), limit).with_payload(true),
            )
            .await
            .map_err(|e| store_err("search failed", e))?;
        Ok(response.result.into_iter().map(hit_from_point).collect())
    }

    async fn count(&self) -> Result<u64, AgentryError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| store_err("count failed", e))?;
        Ok(response.result.map_or(0, |r| r.count))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use qdrant_client::qdrant::{ListValue, Struct};

    use super::*;

    fn params(url: &str) -> QdrantParams {
        QdrantParams {
            url: url.into(),
            api_key: None,
            collection: "vector-embeddings".into(),
        }
    }

    fn record(name: &str, embedding: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            content: format!("{name} content"),
            embedding,
            meta: Default::default(),
        }
    }

    #[test]
    fn payload_values_convert_to_json() {
        let nested = QdrantValue {
            kind: Some(Kind::StructValue(Struct {
                fields: HashMap::from([
                    ("page".to_string(), QdrantValue::from(12_i64)),
                    (
                        "tags".to_string(),
                        QdrantValue {
                            kind: Some(Kind::ListValue(ListValue {
                                values: vec![QdrantValue::from("pdf"), QdrantValue::from(true)],
                            })),
                        },
                    ),
                ]),
            })),
        };
        assert_eq!(to_json(nested), json!({"page": 12, "tags": ["pdf", true]}));
        assert_eq!(to_json(QdrantValue { kind: None }), Value::Null);
    }

    #[test]
    fn scored_point_becomes_search_hit() {
        let point = ScoredPoint {
            score: 0.91,
            payload: HashMap::from([
                ("name".to_string(), QdrantValue::from("book_12")),
                ("content".to_string(), QdrantValue::from("Eve died of brain cancer.")),
                (
                    "meta".to_string(),
                    QdrantValue {
                        kind: Some(Kind::StructValue(Struct {
                            fields: HashMap::from([("page".to_string(), QdrantValue::from(12_i64))]),
                        })),
                    },
                ),
            ]),
            ..Default::default()
        };
        let hit = hit_from_point(point);
        assert_eq!(hit.name, "book_12");
        assert_eq!(hit.content, "Eve died of brain cancer.");
        assert_eq!(hit.meta["page"], 12);
        assert!((hit.score - 0.91).abs() < 1e-6);
    }

    #[test]
    fn point_without_payload_yields_empty_hit() {
        let hit = hit_from_point(ScoredPoint {
            score: 0.4,
            ..Default::default()
        });
        assert!(hit.name.is_empty());
        assert!(hit.content.is_empty());
        assert!(hit.meta.is_empty());
    }

    #[test]
    fn records_become_points() {
        assert!(point_from_record(record("book_1", vec![0.1, 0.2])).is_ok());
    }

    #[tokio::test]
    async fn construction_does_not_connect() {
        let store = QdrantStore::new(&params("http://127.0.0.1:1"), Duration::from_secs(2)).unwrap();
        assert_eq!(store.collection(), "vector-embeddings");
        assert_eq!(store.adapter_type(), AdapterType::VectorStore);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connection_error() {
        let store = QdrantStore::new(&params("http://127.0.0.1:1"), Duration::from_secs(2)).unwrap();
        match store.exists().await {
            Err(AgentryError::VectorStoreConnection { store, .. }) => assert_eq!(store, "qdrant"),
            other => panic!("expected VectorStoreConnection, got {other:?}"),
        }
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    #[ignore = "needs a Qdrant instance on localhost:6334"]
    async fn live_collection_lifecycle() {
        let store = QdrantStore::new(&params("http://localhost:6334"), Duration::from_secs(10)).unwrap();
        store.drop_collection().await.unwrap();
        store.create(3).await.unwrap();
        store
            .upsert(vec![record("a", vec![1.0, 0.0, 0.0]), record("b", vec![0.0, 1.0, 0.0])])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        let hits = store.search(&[1.0, 0.1, 0.0], 1).await.unwrap();
        assert_eq!(hits[0].name, "a");

        // Qdrant rejects a query of the wrong size.
        assert!(matches!(
            store.search(&[1.0, 0.0], 1).await,
            Err(AgentryError::VectorStoreConnection { .. })
        ));
        store.drop_collection().await.unwrap();
    }
}
