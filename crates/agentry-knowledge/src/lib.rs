// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge retrieval for Agentry.
//!
//! A [`KnowledgeAgentBuilder`] turns a list of document URLs, a
//! [`VectorStoreChoice`](agentry_core::VectorStoreChoice) and embedder
//! settings into a [`KnowledgeAgent`] without touching the network. The
//! agent then loads documents (fetch, read, chunk, embed, upsert) and
//! answers questions grounded in the most similar chunks.

pub mod agent;
pub mod builder;
pub mod chunker;
pub mod mongo;
pub mod pipeline;
pub mod qdrant;
pub mod reader;

pub use agent::{KnowledgeAgent, KnowledgeAnswer};
pub use builder::KnowledgeAgentBuilder;
pub use chunker::chunk_document;
pub use mongo::MongoStore;
pub use pipeline::{EmbeddingSample, KnowledgeRetrievalPipeline, LoadReport};
pub use qdrant::QdrantStore;
pub use reader::UrlDocumentReader;
