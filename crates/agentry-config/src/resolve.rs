// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of the loaded configuration into the core builder inputs.
//!
//! Credentials missing from the TOML layers fall back to well-known
//! environment variables (`GROQ_API_KEY`, `QDRANT_URL`, `QDRANT_API_KEY`,
//! `MONGO_CONNECTION_STRING`). A missing credential never fails here: it
//! surfaces later, when the backend or store that needs it is selected.

use std::path::PathBuf;
use std::time::Duration;

use agentry_core::AgentryError;
use agentry_core::types::{
    BackendCandidate, BackendKind, EmbedderConfig, GroqParams, MongoParams, OllamaParams,
    ProviderTier, QdrantParams, VectorStoreChoice,
};

use crate::model::{AgentryConfig, BackendName, VectorDb};

pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const QDRANT_URL_ENV: &str = "QDRANT_URL";
pub const QDRANT_API_KEY_ENV: &str = "QDRANT_API_KEY";
pub const MONGO_CONNECTION_STRING_ENV: &str = "MONGO_CONNECTION_STRING";

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AgentryConfig {
    /// The backend candidate for `tier`, reading credentials from the process environment.
    pub fn backend_candidate(&self, tier: ProviderTier) -> BackendCandidate {
        self.backend_candidate_with(tier, process_env)
    }

    /// As [`backend_candidate`](Self::backend_candidate), with an explicit variable lookup.
    pub fn backend_candidate_with(
        &self,
        tier: ProviderTier,
        env: impl Fn(&str) -> Option<String>,
    ) -> BackendCandidate {
        let name = match tier {
            ProviderTier::Primary => self.backend.primary,
            ProviderTier::Fallback => self.backend.fallback,
        };
        match name {
            BackendName::Groq => BackendCandidate::new(
                tier,
                &self.groq.model,
                BackendKind::Groq(GroqParams {
                    api_key: self
                        .groq
                        .api_key
                        .clone()
                        .filter(|k| !k.trim().is_empty())
                        .or_else(|| env(GROQ_API_KEY_ENV)),
                    base_url: self.groq.base_url.clone(),
                    timeout: Duration::from_secs(self.groq.timeout_secs),
                }),
            ),
            BackendName::Ollama => BackendCandidate::new(
                tier,
                &self.ollama.model,
                BackendKind::Ollama(OllamaParams {
                    host: self.ollama.host.clone(),
                    timeout: Duration::from_secs(self.ollama.timeout_secs),
                }),
            ),
        }
    }

    /// The configured vector store, reading credentials from the process environment.
    pub fn vector_store_choice(&self) -> Result<VectorStoreChoice, AgentryError> {
        self.vector_store_choice_with(process_env)
    }

    /// Resolves `knowledge.vector_db` into connection parameters.
    ///
    /// Returns [`AgentryError::Config`] when the selected store has no URL or
    /// connection string; the unselected store is never inspected.
    pub fn vector_store_choice_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<VectorStoreChoice, AgentryError> {
        let collection = self.knowledge.collection.clone();
        match self.knowledge.vector_db {
            VectorDb::Qdrant => {
                let url = self
                    .qdrant
                    .url
                    .clone()
                    .or_else(|| env(QDRANT_URL_ENV))
                    .ok_or_else(|| {
                        AgentryError::Config(format!(
                            "qdrant selected but neither qdrant.url nor {QDRANT_URL_ENV} is set"
                        ))
                    })?;
                Ok(VectorStoreChoice::Qdrant(QdrantParams {
                    url,
                    api_key: self.qdrant.api_key.clone().or_else(|| env(QDRANT_API_KEY_ENV)),
                    collection,
                }))
            }
            VectorDb::Mongodb => {
                let connection_string = self
                    .mongo
                    .connection_string
                    .clone()
                    .or_else(|| env(MONGO_CONNECTION_STRING_ENV))
                    .ok_or_else(|| {
                        AgentryError::Config(format!(
                            "mongodb selected but neither mongo.connection_string nor {MONGO_CONNECTION_STRING_ENV} is set"
                        ))
                    })?;
                Ok(VectorStoreChoice::Mongo(MongoParams {
                    connection_string,
                    database: self.mongo.database.clone(),
                    collection,
                    vector_index: self.mongo.vector_index.clone(),
                }))
            }
        }
    }

    /// Embedding service settings for the knowledge pipeline.
    pub fn embedder_config(&self) -> EmbedderConfig {
        EmbedderConfig {
            model_id: self.embedder.model.clone(),
            host: self.embedder.host.clone(),
            timeout: Duration::from_secs(self.embedder.timeout_secs),
            dimensions: self.embedder.dimensions,
        }
    }

    /// History database path.
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.database_path)
    }
}
