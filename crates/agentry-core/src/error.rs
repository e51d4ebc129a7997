// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Agentry workspace.

use thiserror::Error;

/// Boxed error source carried by the variants below.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all Agentry adapter traits and builders.
#[derive(Debug, Error)]
pub enum AgentryError {
    /// Missing or invalid required setting.
    #[error("configuration error: {0}")]
    Config(String),

    /// A single completion backend could not be constructed or failed a request.
    #[error("provider error ({backend}): {message}")]
    Provider {
        backend: String,
        message: String,
        source: Option<BoxError>,
    },

    /// Both the primary and the fallback completion backends failed.
    #[error("no completion backend available (primary: {primary}; fallback: {fallback})")]
    BackendUnavailable { primary: String, fallback: String },

    /// The history persistence handle could not be opened.
    #[error("failed to open history storage at {path}: {source}")]
    StorageInit { path: String, source: BoxError },

    /// A history storage operation failed after initialization.
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// The selected vector store could not be reached or rejected a request.
    #[error("vector store error ({store}): {message}")]
    VectorStoreConnection {
        store: String,
        message: String,
        source: Option<BoxError>,
    },

    /// The embedding service could not be reached or returned an unusable response.
    #[error("embedder unreachable: {message}")]
    EmbedderUnreachable {
        message: String,
        source: Option<BoxError>,
    },

    /// A single source document could not be fetched or read.
    #[error("failed to fetch document {url}: {message}")]
    DocumentFetch { url: String, message: String },

    /// Retrieval or completion failed while answering a knowledge query.
    #[error("query failed: {message}")]
    Query {
        message: String,
        source: Option<BoxError>,
    },

    /// A tool invocation failed.
    #[error("tool error: {message}")]
    Tool {
        message: String,
        source: Option<BoxError>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AgentryError {
    /// Shorthand for a [`AgentryError::Provider`] without an underlying source.
    pub fn provider(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            backend: backend.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for failures that a fallback completion backend may recover.
    ///
    /// Only backend construction problems qualify; storage, vector store and
    /// internal failures always propagate.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Config(_))
    }
}
