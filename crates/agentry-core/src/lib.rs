// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Agentry workspace.
//!
//! Provides the adapter traits, the shared error type and the data model
//! (backend candidates, history handles, vector store choices) used by the
//! builders and every adapter crate.

pub mod error;
pub mod traits;
pub mod types;

pub use error::AgentryError;
pub use types::{
    AdapterType, BackendCandidate, BackendKind, HealthStatus, HistoryStore, ProviderTier,
    SessionId, VectorStoreChoice,
};

pub use traits::{
    DocumentReader, EmbeddingAdapter, HistoryAdapter, PluginAdapter, ProviderAdapter,
    ProviderFactory, VectorStoreAdapter,
};
