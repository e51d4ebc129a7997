// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the builders.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh random session identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Embedding,
    VectorStore,
    Tool,
}

// --- Backend selection ---

/// Position of a backend in the two-tier fallback chain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProviderTier {
    Primary,
    Fallback,
}

/// Connection parameters for the Groq (OpenAI-compatible) completion API.
#[derive(Clone, PartialEq, Eq)]
pub struct GroqParams {
    /// API key. `None` means the backend cannot be constructed.
    pub api_key: Option<String>,
    /// Base URL, e.g. `https://api.groq.com/openai/v1`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for GroqParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqParams")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Connection parameters for a local Ollama runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaParams {
    /// Host URL, e.g. `http://localhost:11434`.
    pub host: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// The closed set of supported completion backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Groq(GroqParams),
    Ollama(OllamaParams),
}

impl BackendKind {
    /// Short provider name used in logs and descriptors.
    pub fn provider_name(&self) -> &'static str {
        match self {
            BackendKind::Groq(_) => "groq",
            BackendKind::Ollama(_) => "ollama",
        }
    }
}

/// A completion backend the builder may bind an agent to.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCandidate {
    pub tier: ProviderTier,
    pub model_id: String,
    pub kind: BackendKind,
}

impl BackendCandidate {
    pub fn new(tier: ProviderTier, model_id: impl Into<String>, kind: BackendKind) -> Self {
        Self {
            tier,
            model_id: model_id.into(),
            kind,
        }
    }

    /// `provider/model` label, e.g. `groq/llama-3.3-70b-versatile`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.kind.provider_name(), self.model_id)
    }
}

// --- Provider request/response ---

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A single message in a provider conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Tool calls issued by an assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For `Role::Tool` messages, the call this message answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

/// Description of a tool offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema of the tool input.
    pub parameters: serde_json::Value,
}

/// Token usage reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A request to a completion backend.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
}

/// A completion backend response.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

// --- Embedding ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

/// Embedding service settings for the knowledge pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedderConfig {
    pub model_id: String,
    pub host: String,
    /// Generous by default: bulk embedding of whole documents is slow.
    pub timeout: Duration,
    /// Declared output dimensionality, used to size new collections.
    pub dimensions: usize,
}

// --- History ---

/// Reference to a persistent history handle: a SQLite file and a table in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    pub path: PathBuf,
    pub table: String,
}

/// A persisted conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

/// Summary of one stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub message_count: i64,
    pub last_activity: String,
}

// --- Knowledge ---

/// Qdrant connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct QdrantParams {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
}

impl fmt::Debug for QdrantParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QdrantParams")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("collection", &self.collection)
            .finish()
    }
}

/// MongoDB connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct MongoParams {
    pub connection_string: String,
    pub database: String,
    pub collection: String,
    /// Atlas Search index over `embedding`. `None` ranks on the client.
    pub vector_index: Option<String>,
}

impl fmt::Debug for MongoParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoParams")
            .field("connection_string", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("vector_index", &self.vector_index)
            .finish()
    }
}

/// Which vector store backs a knowledge pipeline. Fixed for the pipeline's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorStoreChoice {
    Qdrant(QdrantParams),
    Mongo(MongoParams),
}

impl VectorStoreChoice {
    pub fn store_name(&self) -> &'static str {
        match self {
            VectorStoreChoice::Qdrant(_) => "qdrant",
            VectorStoreChoice::Mongo(_) => "mongodb",
        }
    }

    pub fn collection(&self) -> &str {
        match self {
            VectorStoreChoice::Qdrant(p) => &p.collection,
            VectorStoreChoice::Mongo(p) => &p.collection,
        }
    }
}

/// A source document after reading, before chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

/// A chunk with its embedding, ready for upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Random per-upsert identifier; the stores do not deduplicate.
    pub id: String,
    pub name: String,
    pub content: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

/// A chunk returned by similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub content: String,
    pub score: f32,
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}
