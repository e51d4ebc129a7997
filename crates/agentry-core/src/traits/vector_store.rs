// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector store adapter trait (Qdrant, MongoDB).

use async_trait::async_trait;

use crate::error::AgentryError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{SearchHit, VectorRecord};

/// Adapter for an external vector store holding one named collection.
///
/// Implementations connect lazily: constructing one performs no I/O.
#[async_trait]
pub trait VectorStoreAdapter: PluginAdapter {
    /// Name of the collection this adapter writes to.
    fn collection(&self) -> &str;

    /// Returns true if the collection exists.
    async fn exists(&self) -> Result<bool, AgentryError>;

    /// Creates the collection for vectors of the given size. No-op if present.
    async fn create(&self, dimensions: usize) -> Result<(), AgentryError>;

    /// Drops the collection and everything in it. No-op if absent.
    async fn drop_collection(&self) -> Result<(), AgentryError>;

    /// Inserts records. Records are never deduplicated.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), AgentryError>;

    /// Returns up to `limit` records closest to `query`, best first.
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, AgentryError>;

    /// Number of records in the collection.
    async fn count(&self) -> Result<u64, AgentryError>;
}
