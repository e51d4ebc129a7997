// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Agentry workspace.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Agentry configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentryConfig {
    /// Agent identity and output settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Which completion backend is tried first and which second.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Groq (OpenAI-compatible) API settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Local Ollama chat runtime settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Conversation history storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Web search tool settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Playground HTTP server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Knowledge-base pipeline settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Qdrant vector store settings.
    #[serde(default)]
    pub qdrant: QdrantConfig,

    /// MongoDB vector store settings.
    #[serde(default)]
    pub mongo: MongoConfig,

    /// Embedding service settings.
    #[serde(default)]
    pub embedder: EmbedderSettings,
}

/// Agent identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the conversational agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Ask the model to format answers as markdown.
    #[serde(default = "default_true")]
    pub markdown: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            markdown: true,
        }
    }
}

fn default_agent_name() -> String {
    "Web Agent".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Completion backend identifiers accepted in `[backend]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendName {
    Groq,
    Ollama,
}

/// Two-tier backend preference.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    #[serde(default = "default_primary")]
    pub primary: BackendName,

    #[serde(default = "default_fallback")]
    pub fallback: BackendName,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            fallback: default_fallback(),
        }
    }
}

fn default_primary() -> BackendName {
    BackendName::Groq
}

fn default_fallback() -> BackendName {
    BackendName::Ollama
}

/// Groq API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// API key. `None` falls back to the `GROQ_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_groq_model")]
    pub model: String,

    #[serde(default = "default_groq_base_url")]
    pub base_url: String,

    #[serde(default = "default_groq_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_groq_model(),
            base_url: default_groq_base_url(),
            timeout_secs: default_groq_timeout(),
        }
    }
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_groq_timeout() -> u64 {
    60
}

/// Ollama chat runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_host")]
    pub host: String,

    #[serde(default = "default_ollama_model")]
    pub model: String,

    #[serde(default = "default_ollama_timeout")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout(),
        }
    }
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "gemma2:2b".to_string()
}

fn default_ollama_timeout() -> u64 {
    120
}

/// History storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file. Parent directories are created on open.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "tmp/agents.db".to_string()
}

/// Web search tool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Attach the DuckDuckGo tool to the conversational agent.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_results: default_max_results(),
            timeout_secs: default_search_timeout(),
        }
    }
}

fn default_max_results() -> usize {
    5
}

fn default_search_timeout() -> u64 {
    30
}

/// Playground HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,

    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    7172
}

/// Vector store identifiers accepted in `knowledge.vector_db`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorDb {
    Qdrant,
    Mongodb,
}

/// Knowledge pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    #[serde(default = "default_vector_db")]
    pub vector_db: VectorDb,

    /// Collection name, shared by both vector stores.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Document URLs ingested by `load_documents`.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Number of chunks retrieved per query.
    #[serde(default = "default_num_documents")]
    pub num_documents: usize,

    /// Maximum characters per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            vector_db: default_vector_db(),
            collection: default_collection(),
            sources: Vec::new(),
            num_documents: default_num_documents(),
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_vector_db() -> VectorDb {
    VectorDb::Mongodb
}

fn default_collection() -> String {
    "vector-embeddings".to_string()
}

fn default_num_documents() -> usize {
    5
}

fn default_chunk_size() -> usize {
    5000
}

/// Qdrant configuration. Both values fall back to `QDRANT_URL` / `QDRANT_API_KEY`.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QdrantConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for QdrantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// MongoDB configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MongoConfig {
    /// Falls back to `MONGO_CONNECTION_STRING`.
    #[serde(default)]
    pub connection_string: Option<String>,

    /// Database holding the chunk collection. Defaults to `agentry`;
    /// collections written by agno-based deployments live in `agno`, so set
    /// `database = "agno"` to query them.
    #[serde(default = "default_mongo_database")]
    pub database: String,

    /// Name of an Atlas Vector Search index on the `embedding` field. When
    /// set, queries run `$vectorSearch` on the server; the index must be
    /// created in Atlas beforehand. When unset, the collection is ranked on
    /// the client.
    #[serde(default)]
    pub vector_index: Option<String>,
}

impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConfig")
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "<redacted>"),
            )
            .field("database", &self.database)
            .field("vector_index", &self.vector_index)
            .finish()
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            database: default_mongo_database(),
            vector_index: None,
        }
    }
}

fn default_mongo_database() -> String {
    "agentry".to_string()
}

/// Embedding service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedderSettings {
    #[serde(default = "default_embedder_model")]
    pub model: String,

    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Whole-document embedding is slow on CPU hosts.
    #[serde(default = "default_embedder_timeout")]
    pub timeout_secs: u64,

    /// Declared output dimensionality of `model`.
    #[serde(default = "default_embedder_dimensions")]
    pub dimensions: usize,
}

impl Default for EmbedderSettings {
    fn default() -> Self {
        Self {
            model: default_embedder_model(),
            host: default_ollama_host(),
            timeout_secs: default_embedder_timeout(),
            dimensions: default_embedder_dimensions(),
        }
    }
}

fn default_embedder_model() -> String {
    "openhermes".to_string()
}

fn default_embedder_timeout() -> u64 {
    1000
}

fn default_embedder_dimensions() -> usize {
    4096
}
